//! Identity records and password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

/// Role tag attached to an identity (e.g. `admin`, `user`).
///
/// Roles are free-form; no enumeration is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Create a role tag.
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// The raw tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Self::new(role)
    }
}

/// One authenticatable principal.
///
/// Loaded once at startup and never mutated. The password is held only as an
/// Argon2 PHC hash.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    id: i64,
    username: String,
    password_hash: String,
    role: Role,
}

impl IdentityRecord {
    /// Create a record, hashing `password` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns error if password hashing fails.
    pub fn new(
        id: i64,
        username: impl Into<String>,
        password: &str,
        role: impl Into<Role>,
    ) -> Result<Self, IdentityError> {
        Ok(Self {
            id,
            username: username.into(),
            password_hash: hash_password(password)?,
            role: role.into(),
        })
    }

    /// Create a record from an existing PHC hash string.
    ///
    /// # Errors
    ///
    /// Returns error if `password_hash` does not parse as a PHC string.
    pub fn with_hash(
        id: i64,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: impl Into<Role>,
    ) -> Result<Self, IdentityError> {
        let username = username.into();
        let password_hash = password_hash.into();

        PasswordHash::new(&password_hash).map_err(|e| IdentityError::InvalidHash {
            username: username.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            id,
            username,
            password_hash,
            role: role.into(),
        })
    }

    /// Numeric identifier.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Login name (case-sensitive).
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Role tag.
    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    /// Check a candidate password against the stored hash.
    #[must_use]
    pub fn verify_password(&self, password: &str) -> bool {
        verify_hash(password, &self.password_hash)
    }

    /// Safe view of the record for responses (no password material).
    #[must_use]
    pub fn to_public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }
}

impl std::fmt::Debug for IdentityRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Public identity representation (for API responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
    /// Numeric identifier.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Role tag.
    pub role: Role,
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| IdentityError::Hash(e.to_string()))
}

/// Verify a password against a PHC hash. Unparseable hashes never match.
pub(crate) fn verify_hash(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = IdentityRecord::new(7, "alice", "s3cret", "user").unwrap();
        assert_eq!(record.id(), 7);
        assert_eq!(record.username(), "alice");
        assert_eq!(record.role().as_str(), "user");
        assert!(record.password_hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_password_verification() {
        let record = IdentityRecord::new(1, "alice", "s3cret", "user").unwrap();
        assert!(record.verify_password("s3cret"));
        assert!(!record.verify_password("S3cret"));
        assert!(!record.verify_password(""));
    }

    #[test]
    fn test_with_hash() {
        let hash = hash_password("pw").unwrap();
        let record = IdentityRecord::with_hash(3, "bob", hash, "admin").unwrap();
        assert!(record.verify_password("pw"));
        assert_eq!(record.role().as_str(), "admin");
    }

    #[test]
    fn test_with_invalid_hash() {
        let result = IdentityRecord::with_hash(3, "bob", "plaintext", "admin");
        assert!(matches!(
            result,
            Err(IdentityError::InvalidHash { ref username, .. }) if username == "bob"
        ));
    }

    #[test]
    fn test_public_view_has_no_secret() {
        let record = IdentityRecord::new(1, "admin", "password", "admin").unwrap();
        let json = serde_json::to_value(record.to_public()).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["username"], "admin");
        assert_eq!(json["role"], "admin");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_debug_redacts_hash() {
        let record = IdentityRecord::new(1, "admin", "password", "admin").unwrap();
        let debug = format!("{record:?}");
        assert!(!debug.contains("argon2"));
    }

    #[test]
    fn test_roles() {
        assert_ne!(Role::from("admin"), Role::from("Admin"));
        assert_eq!(Role::new("user").to_string(), "user");
    }
}
