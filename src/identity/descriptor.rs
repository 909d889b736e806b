use serde::{Deserialize, Serialize};

use crate::directory::Identity;
use crate::roles::Role;

/// The public, password-free projection of an [`Identity`] issued after a
/// successful login. Field names serialize in camelCase to match the client
/// payload shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub token: String,
    pub role: Role,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl From<&Identity> for SessionDescriptor {
    fn from(id: &Identity) -> Self {
        SessionDescriptor {
            id: id.id.clone(),
            first_name: id.first_name.clone(),
            last_name: id.last_name.clone(),
            email: id.email.clone(),
            token: id.token.clone(),
            role: id.role,
            profile_image: id.profile_image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_without_password_fields() {
        let d = SessionDescriptor {
            id: "u-1".into(),
            first_name: "Demo".into(),
            last_name: "Corporate".into(),
            email: "corporate@healthwyz.mu".into(),
            token: "tok".into(),
            role: Role::Corporate,
            profile_image: None,
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["firstName"], "Demo");
        assert_eq!(json["role"], "corporate");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
