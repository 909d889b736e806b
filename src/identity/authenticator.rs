use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use super::descriptor::SessionDescriptor;
use crate::directory::Directory;
use crate::roles::Role;
use crate::security::verify_password;
use crate::tprintln;

/// The single user-facing failure message. Every [`AuthError`] collapses to
/// this at the boundary so callers cannot distinguish unknown emails from
/// wrong passwords or wrong roles (anti-enumeration); the richer taxonomy
/// stays internal for logging.
pub const GENERIC_AUTH_MESSAGE: &str =
    "Invalid credentials. Please check your email, password and role.";

/// Internal authentication failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Missing/empty email, password, or role in the request.
    #[error("malformed login request")]
    Malformed,
    /// No identity for that email.
    #[error("no identity for email")]
    NotFound,
    /// Identity found, password mismatch.
    #[error("password mismatch")]
    BadCredentials,
    /// Identity found, password correct, role does not match.
    #[error("role mismatch")]
    RoleMismatch,
}

impl AuthError {
    /// Stable code for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Malformed => "malformed",
            AuthError::NotFound => "not_found",
            AuthError::BadCredentials => "bad_credentials",
            AuthError::RoleMismatch => "role_mismatch",
        }
    }

    /// What the client is told, regardless of variant.
    pub fn public_message(&self) -> &'static str {
        GENERIC_AUTH_MESSAGE
    }
}

impl From<AuthError> for crate::error::AppError {
    /// Boundary mapping: the variant picks the status class, the message is
    /// always the generic one.
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Malformed => crate::error::AppError::user(err.code(), GENERIC_AUTH_MESSAGE),
            _ => crate::error::AppError::auth(err.code(), GENERIC_AUTH_MESSAGE),
        }
    }
}

/// Validates (email, password, role) triples against an injected directory
/// and produces password-free session descriptors.
///
/// Pure over the directory: no side effects, no interior state, safe to share
/// across handlers.
pub struct SessionAuthenticator {
    directory: Arc<Directory>,
}

impl SessionAuthenticator {
    pub fn new(directory: Arc<Directory>) -> Self { Self { directory } }

    pub fn directory(&self) -> &Directory { &self.directory }

    /// Authenticate a login attempt.
    ///
    /// Order of checks: non-empty inputs, case-insensitive email lookup,
    /// Argon2 password verification, exact role equality. `role` arrives as
    /// the raw wire string; a string outside the role set can never equal a
    /// stored role and surfaces as [`AuthError::RoleMismatch`] once the
    /// credentials themselves are good.
    pub fn authenticate(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<SessionDescriptor, AuthError> {
        if email.trim().is_empty() || password.is_empty() || role.trim().is_empty() {
            return Err(AuthError::Malformed);
        }
        let Some(identity) = self.directory.find(email) else {
            return Err(AuthError::NotFound);
        };
        if !verify_password(&identity.password_hash, password) {
            return Err(AuthError::BadCredentials);
        }
        match Role::from_str(role) {
            Ok(r) if r == identity.role => {}
            _ => return Err(AuthError::RoleMismatch),
        }
        tprintln!("auth.login user={} role={}", identity.email, identity.role);
        Ok(SessionDescriptor::from(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::IdentitySeed;

    fn corporate_directory() -> Arc<Directory> {
        let seeds = vec![IdentitySeed {
            id: Some("corp-1".into()),
            first_name: "Demo".into(),
            last_name: "Corporate".into(),
            email: "corporate@healthwyz.mu".into(),
            password: "CorporatePass123!".into(),
            role: Role::Corporate,
            profile_image: None,
        }];
        Arc::new(Directory::build([seeds]).unwrap())
    }

    #[test]
    fn success_with_uppercase_email() {
        let auth = SessionAuthenticator::new(corporate_directory());
        let d = auth
            .authenticate("CORPORATE@HEALTHWYZ.MU", "CorporatePass123!", "corporate")
            .unwrap();
        assert_eq!(d.role, Role::Corporate);
        assert_eq!(d.email, "corporate@healthwyz.mu");
        assert_eq!(d.id, "corp-1");
    }

    #[test]
    fn email_case_does_not_change_the_result() {
        let auth = SessionAuthenticator::new(corporate_directory());
        let a = auth.authenticate("Corporate@Healthwyz.mu", "CorporatePass123!", "corporate");
        let b = auth.authenticate("corporate@healthwyz.mu", "CorporatePass123!", "corporate");
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_password_is_bad_credentials() {
        let auth = SessionAuthenticator::new(corporate_directory());
        let err = auth
            .authenticate("corporate@healthwyz.mu", "wrongpw", "corporate")
            .unwrap_err();
        assert_eq!(err, AuthError::BadCredentials);
    }

    #[test]
    fn wrong_role_is_role_mismatch() {
        let auth = SessionAuthenticator::new(corporate_directory());
        let err = auth
            .authenticate("corporate@healthwyz.mu", "CorporatePass123!", "doctor")
            .unwrap_err();
        assert_eq!(err, AuthError::RoleMismatch);
    }

    #[test]
    fn unknown_role_string_is_role_mismatch_once_credentials_pass() {
        let auth = SessionAuthenticator::new(corporate_directory());
        let err = auth
            .authenticate("corporate@healthwyz.mu", "CorporatePass123!", "janitor")
            .unwrap_err();
        assert_eq!(err, AuthError::RoleMismatch);
    }

    #[test]
    fn unknown_email_is_not_found() {
        let auth = SessionAuthenticator::new(corporate_directory());
        let err = auth.authenticate("nobody@healthwyz.mu", "x", "patient").unwrap_err();
        assert_eq!(err, AuthError::NotFound);
    }

    #[test]
    fn empty_inputs_are_malformed() {
        let auth = SessionAuthenticator::new(corporate_directory());
        assert_eq!(auth.authenticate("", "pw", "corporate").unwrap_err(), AuthError::Malformed);
        assert_eq!(auth.authenticate("corporate@healthwyz.mu", "", "corporate").unwrap_err(), AuthError::Malformed);
        assert_eq!(auth.authenticate("corporate@healthwyz.mu", "pw", "  ").unwrap_err(), AuthError::Malformed);
    }

    #[test]
    fn descriptor_never_carries_the_hash() {
        let auth = SessionAuthenticator::new(corporate_directory());
        let d = auth
            .authenticate("corporate@healthwyz.mu", "CorporatePass123!", "corporate")
            .unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("CorporatePass123!"));
    }

    #[test]
    fn boundary_mapping_picks_status_class_but_keeps_the_generic_message() {
        use crate::error::AppError;
        let e: AppError = AuthError::Malformed.into();
        assert_eq!(e.http_status(), 400);
        for v in [AuthError::NotFound, AuthError::BadCredentials, AuthError::RoleMismatch] {
            let e: AppError = v.into();
            assert_eq!(e.http_status(), 401);
            assert_eq!(e.message(), GENERIC_AUTH_MESSAGE);
            assert_eq!(e.code_str(), v.code());
        }
    }

    #[test]
    fn all_failures_share_one_public_message() {
        for e in [AuthError::Malformed, AuthError::NotFound, AuthError::BadCredentials, AuthError::RoleMismatch] {
            assert_eq!(e.public_message(), GENERIC_AUTH_MESSAGE);
        }
    }
}
