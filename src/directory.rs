//! Identity directory
//! ------------------
//! The in-memory directory of authenticatable principals. It is built once at
//! startup by merging role-partitioned fixture collections (doctors, nurses,
//! nannies, patients) with the fixed demo accounts, and is immutable from then
//! on: lookups are O(1) on lowercased email and safe for concurrent readers.
//!
//! The directory is explicitly constructed and handed to the authenticator;
//! there is no module-level global. Fixture passwords are hashed during the
//! build and bearer tokens are minted per identity at the same time.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::security::hash_password;

/// 256-bit random token, base64url without padding. Tokens gate the session
/// lookup, so an RNG failure fails the build instead of minting zeroed tokens.
fn gen_token() -> Result<String> {
    let mut buf = [0u8; 32];
    getrandom::getrandom(&mut buf).map_err(|e| anyhow!(e.to_string()))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf))
}

/// One fixture entry as it appears in seed collections and fixture files.
/// Carries the plaintext demo password; it never survives the directory build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySeed {
    #[serde(default)]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// A directory entry: one authenticatable principal.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Stored lowercased; also the directory key.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
    /// Opaque bearer token minted at directory build.
    pub token: String,
    pub profile_image: Option<String>,
}

/// Immutable lookup structure keyed on lowercased email.
#[derive(Debug, Default)]
pub struct Directory {
    entries: HashMap<String, Identity>,
}

impl Directory {
    /// Build a directory from any number of seed collections merged in order.
    /// Duplicate emails (case-insensitive) across collections are a build
    /// error, keeping the email-uniqueness invariant explicit.
    pub fn build<I>(collections: I) -> Result<Directory>
    where
        I: IntoIterator<Item = Vec<IdentitySeed>>,
    {
        let mut entries: HashMap<String, Identity> = HashMap::new();
        for coll in collections {
            for seed in coll {
                let email = seed.email.trim().to_lowercase();
                if email.is_empty() {
                    return Err(anyhow!("identity fixture with empty email (name: {} {})", seed.first_name, seed.last_name));
                }
                if entries.contains_key(&email) {
                    return Err(anyhow!("duplicate identity email in fixtures: {}", email));
                }
                let password_hash = hash_password(&seed.password)
                    .with_context(|| format!("while hashing fixture password for {}", email))?;
                let token = gen_token()
                    .with_context(|| format!("while minting bearer token for {}", email))?;
                let identity = Identity {
                    id: seed.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    first_name: seed.first_name,
                    last_name: seed.last_name,
                    email: email.clone(),
                    password_hash,
                    role: seed.role,
                    token,
                    profile_image: seed.profile_image,
                };
                entries.insert(email, identity);
            }
        }
        Ok(Directory { entries })
    }

    /// Case-insensitive lookup by email.
    pub fn find(&self, email: &str) -> Option<&Identity> {
        self.entries.get(email.trim().to_lowercase().as_str())
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Iterate all identities (startup inventory logging, tests).
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.entries.values()
    }
}
