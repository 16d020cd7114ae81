//! Identity store and credential validation.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::IdentityError;
use crate::identity::{IdentityRecord, hash_password, verify_hash};

/// Username lookup over some identity storage.
///
/// This is the only storage assumption the validator makes. Implementations
/// return independent copies, normally zero or one record.
pub trait IdentityLookup: Send + Sync {
    /// All records whose username equals `username` exactly, in store order.
    fn find_all(&self, username: &str) -> Vec<IdentityRecord>;
}

/// Immutable in-memory identity store.
#[derive(Debug, Clone, Default)]
pub struct IdentityStore {
    records: Vec<IdentityRecord>,
}

impl IdentityStore {
    /// Build a store from records. Duplicate usernames are logged, not rejected.
    #[must_use]
    pub fn new(records: Vec<IdentityRecord>) -> Self {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.username()) {
                tracing::warn!(
                    username = record.username(),
                    "Duplicate username in identity store; first matching credentials win"
                );
            }
        }

        Self { records }
    }

    /// Local development accounts: `admin`/`password` and `user`/`userpass`.
    ///
    /// # Errors
    ///
    /// Returns error if password hashing fails.
    pub fn demo() -> Result<Self, IdentityError> {
        Ok(Self::new(vec![
            IdentityRecord::new(1, "admin", "password", "admin")?,
            IdentityRecord::new(2, "user", "userpass", "user")?,
        ]))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in store order.
    pub fn iter(&self) -> impl Iterator<Item = &IdentityRecord> {
        self.records.iter()
    }
}

impl IdentityLookup for IdentityStore {
    fn find_all(&self, username: &str) -> Vec<IdentityRecord> {
        self.records
            .iter()
            .filter(|r| r.username() == username)
            .cloned()
            .collect()
    }
}

/// Checks username/password pairs against an identity lookup.
#[derive(Clone)]
pub struct CredentialValidator {
    lookup: Arc<dyn IdentityLookup>,
    decoy_hash: String,
}

impl CredentialValidator {
    /// Create a validator over `lookup`.
    ///
    /// # Errors
    ///
    /// Returns error if the decoy hash cannot be computed.
    pub fn new(lookup: Arc<dyn IdentityLookup>) -> Result<Self, IdentityError> {
        Ok(Self {
            lookup,
            decoy_hash: hash_password("gatepass-decoy")?,
        })
    }

    /// Return the first record matching both fields exactly, or `None`.
    ///
    /// No normalization is applied. An unknown username still costs one hash
    /// verification so it cannot be told apart from a wrong password by timing.
    #[must_use]
    pub fn validate(&self, username: &str, password: &str) -> Option<IdentityRecord> {
        let candidates = self.lookup.find_all(username);

        if candidates.is_empty() {
            let _ = verify_hash(password, &self.decoy_hash);
            return None;
        }

        candidates
            .into_iter()
            .find(|record| record.verify_password(password))
    }
}

impl std::fmt::Debug for CredentialValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialValidator").finish_non_exhaustive()
    }
}
