//! Session persistence across two surfaces
//! ----------------------------------------
//! A session must be legible to two consumers at once: the client-side UI
//! (a key-value store holding the full session JSON plus token and role under
//! fixed keys) and a server-side request gate (HTTP cookies carrying token,
//! role and id). [`SessionPersistence`] is the single entry point that writes
//! and clears both surfaces together, so they cannot drift out of sync.
//!
//! Each live session owns its own client surface, keyed by bearer token;
//! concurrent clients never see or clobber each other's entries.

use std::collections::HashMap;

use axum::http::{HeaderMap, HeaderValue};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use super::descriptor::SessionDescriptor;
use crate::error::AppResult;

/// Client store key holding the full session JSON.
pub const STORAGE_SESSION_KEY: &str = "healthwyz_user";
/// Client store key holding the bearer token alone.
pub const STORAGE_TOKEN_KEY: &str = "healthwyz_token";
/// Client store key holding the role alone.
pub const STORAGE_ROLE_KEY: &str = "healthwyz_role";

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";
pub const USER_ROLE_COOKIE: &str = "user_role";
pub const USER_ID_COOKIE: &str = "user_id";

/// Cookie lifetime.
pub const SESSION_COOKIE_DAYS: i64 = 7;
const COOKIE_MAX_AGE_SECS: i64 = SESSION_COOKIE_DAYS * 24 * 60 * 60;
const COOKIE_EPOCH: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

fn http_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn set_cookie(name: &str, value: &str) -> HeaderValue {
    // Lax same-site, site-wide path, multi-day expiry; readable by the
    // server-side gate on every request
    let expires = http_date(Utc::now() + Duration::days(SESSION_COOKIE_DAYS));
    HeaderValue::from_str(&format!(
        "{}={}; Expires={}; Max-Age={}; Path=/; SameSite=Lax",
        name, value, expires, COOKIE_MAX_AGE_SECS
    ))
    .unwrap()
}

fn clear_cookie(name: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=deleted; Expires={}; Max-Age=0; Path=/; SameSite=Lax",
        name, COOKIE_EPOCH
    ))
    .unwrap()
}

/// Extract a cookie value from request headers.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name { return Some(v[1..].to_string()); }
        }
    }
    None
}

/// The client-readable key-value surface.
#[derive(Debug, Default)]
pub struct ClientStore {
    entries: RwLock<HashMap<String, String>>,
}

impl ClientStore {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&self, key: &str, value: String) {
        self.entries.write().insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// Dual-surface session persistence.
///
/// Live sessions are keyed by bearer token, one client surface per session.
/// `persist` and `clear` return the Set-Cookie header values for the cookie
/// surface; the caller attaches them to the HTTP response while the client
/// store has already been updated. Keeping both writes behind one call is the
/// whole point of this type.
#[derive(Debug, Default)]
pub struct SessionPersistence {
    sessions: RwLock<HashMap<String, ClientStore>>,
}

impl SessionPersistence {
    pub fn new() -> Self { Self::default() }

    /// Write the session to both surfaces. Returns the three Set-Cookie
    /// values (token, role, id).
    pub fn persist(&self, session: &SessionDescriptor) -> AppResult<Vec<HeaderValue>> {
        let json = serde_json::to_string(session)?;
        let surface = ClientStore::new();
        surface.insert(STORAGE_SESSION_KEY, json);
        surface.insert(STORAGE_TOKEN_KEY, session.token.clone());
        surface.insert(STORAGE_ROLE_KEY, session.role.as_str().to_string());
        self.sessions.write().insert(session.token.clone(), surface);
        Ok(vec![
            set_cookie(AUTH_TOKEN_COOKIE, &session.token),
            set_cookie(USER_ROLE_COOKIE, session.role.as_str()),
            set_cookie(USER_ID_COOKIE, &session.id),
        ])
    }

    /// Read back the session persisted under `token`. Missing or malformed
    /// data is treated as absence, never an error.
    pub fn load(&self, token: &str) -> Option<SessionDescriptor> {
        let sessions = self.sessions.read();
        let raw = sessions.get(token)?.get(STORAGE_SESSION_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Drop the client surface for `token` (when presented) and expire every
    /// cookie. The surface carries all client keys, so persist and clear stay
    /// symmetric by construction; other sessions are untouched.
    pub fn clear(&self, token: Option<&str>) -> Vec<HeaderValue> {
        if let Some(t) = token {
            self.sessions.write().remove(t);
        }
        vec![
            clear_cookie(AUTH_TOKEN_COOKIE),
            clear_cookie(USER_ROLE_COOKIE),
            clear_cookie(USER_ID_COOKIE),
        ]
    }

    /// Read one client-surface key for a live session.
    pub fn client_value(&self, token: &str, key: &str) -> Option<String> {
        self.sessions.read().get(token).and_then(|s| s.get(key))
    }

    /// Client-side write into a live session's surface.
    pub fn client_insert(&self, token: &str, key: &str, value: String) {
        if let Some(surface) = self.sessions.read().get(token) {
            surface.insert(key, value);
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;

    fn descriptor() -> SessionDescriptor {
        SessionDescriptor {
            id: "u-42".into(),
            first_name: "Demo".into(),
            last_name: "Patient".into(),
            email: "patient@healthwyz.mu".into(),
            token: "tok-abc".into(),
            role: Role::Patient,
            profile_image: Some("/images/p.jpg".into()),
        }
    }

    fn second_descriptor() -> SessionDescriptor {
        SessionDescriptor {
            id: "u-7".into(),
            first_name: "Demo".into(),
            last_name: "Doctor".into(),
            email: "doctor@healthwyz.mu".into(),
            token: "tok-def".into(),
            role: Role::Doctor,
            profile_image: None,
        }
    }

    #[test]
    fn persist_then_load_round_trips() {
        let p = SessionPersistence::new();
        p.persist(&descriptor()).unwrap();
        assert_eq!(p.load("tok-abc"), Some(descriptor()));
    }

    #[test]
    fn persist_writes_all_three_client_keys() {
        let p = SessionPersistence::new();
        p.persist(&descriptor()).unwrap();
        assert!(p.client_value("tok-abc", STORAGE_SESSION_KEY).is_some());
        assert_eq!(p.client_value("tok-abc", STORAGE_TOKEN_KEY).as_deref(), Some("tok-abc"));
        assert_eq!(p.client_value("tok-abc", STORAGE_ROLE_KEY).as_deref(), Some("patient"));
    }

    #[test]
    fn sessions_are_independent_per_token() {
        let p = SessionPersistence::new();
        p.persist(&descriptor()).unwrap();
        p.persist(&second_descriptor()).unwrap();
        assert_eq!(p.active_sessions(), 2);
        // Both sessions stay loadable under their own token
        assert_eq!(p.load("tok-abc"), Some(descriptor()));
        assert_eq!(p.load("tok-def"), Some(second_descriptor()));
        // Clearing one leaves the other intact
        p.clear(Some("tok-def"));
        assert_eq!(p.load("tok-def"), None);
        assert_eq!(p.load("tok-abc"), Some(descriptor()));
        assert_eq!(p.active_sessions(), 1);
    }

    #[test]
    fn clear_is_symmetric_with_persist() {
        let p = SessionPersistence::new();
        p.persist(&descriptor()).unwrap();
        let cookies = p.clear(Some("tok-abc"));
        assert_eq!(p.load("tok-abc"), None);
        assert!(p.client_value("tok-abc", STORAGE_SESSION_KEY).is_none());
        assert!(p.client_value("tok-abc", STORAGE_TOKEN_KEY).is_none());
        assert!(p.client_value("tok-abc", STORAGE_ROLE_KEY).is_none());
        assert_eq!(p.active_sessions(), 0);
        assert_eq!(cookies.len(), 3);
        for c in cookies {
            let s = c.to_str().unwrap();
            assert!(s.contains(COOKIE_EPOCH), "clear cookie must expire in the past: {s}");
            assert!(s.contains("Max-Age=0"));
        }
    }

    #[test]
    fn clear_without_a_token_still_expires_cookies() {
        let p = SessionPersistence::new();
        p.persist(&descriptor()).unwrap();
        let cookies = p.clear(None);
        assert_eq!(cookies.len(), 3);
        // No token presented, no session dropped
        assert_eq!(p.load("tok-abc"), Some(descriptor()));
    }

    #[test]
    fn malformed_stored_json_reads_as_absent() {
        let p = SessionPersistence::new();
        p.persist(&descriptor()).unwrap();
        p.client_insert("tok-abc", STORAGE_SESSION_KEY, "{not json".into());
        assert_eq!(p.load("tok-abc"), None);
    }

    #[test]
    fn unknown_token_reads_as_absent() {
        let p = SessionPersistence::new();
        assert_eq!(p.load("tok-abc"), None);
    }

    #[test]
    fn cookies_carry_lax_sitewide_week_long_attributes() {
        let p = SessionPersistence::new();
        let cookies = p.persist(&descriptor()).unwrap();
        assert_eq!(p.active_sessions(), 1);
        assert_eq!(cookies.len(), 3);
        let names: Vec<String> = cookies
            .iter()
            .map(|c| c.to_str().unwrap().split('=').next().unwrap().to_string())
            .collect();
        assert_eq!(names, vec![AUTH_TOKEN_COOKIE, USER_ROLE_COOKIE, USER_ID_COOKIE]);
        for c in &cookies {
            let s = c.to_str().unwrap();
            assert!(s.contains("Path=/"));
            assert!(s.contains("SameSite=Lax"));
            assert!(s.contains(&format!("Max-Age={}", 7 * 24 * 60 * 60)));
            assert!(s.contains("Expires="));
        }
    }

    #[test]
    fn parse_cookie_finds_named_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("auth_token=tok-abc; user_role=patient; user_id=u-42"),
        );
        assert_eq!(parse_cookie(&headers, AUTH_TOKEN_COOKIE).as_deref(), Some("tok-abc"));
        assert_eq!(parse_cookie(&headers, USER_ROLE_COOKIE).as_deref(), Some("patient"));
        assert_eq!(parse_cookie(&headers, "missing"), None);
    }
}
