//! User identity collaborator.
//!
//! The state machine only needs to know whether a user exists and whether
//! a presented credential checks out; how credentials are stored or
//! hashed is the collaborator's concern.

use std::collections::HashMap;
use std::path::Path;

use berth_common::error::{BerthError, Result};
use berth_common::types::UserId;

/// Narrow identity interface consumed by the state machine.
pub trait Identity: Send + Sync {
    /// Whether a user with this id is known.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be consulted.
    fn exists(&self, user: &UserId) -> Result<bool>;

    /// Whether the presented credential matches the user's stored one.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be consulted.
    fn verify(&self, user: &UserId, credential: &str) -> Result<bool>;
}

/// Identity backed by a fixed user-to-credential map.
///
/// Credentials are opaque strings; callers hand in whatever the external
/// hashing scheme produced.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    users: HashMap<UserId, String>,
    permissive: bool,
}

impl StaticRegistry {
    /// Builds a registry from (user, credential) pairs.
    #[must_use]
    pub fn with_users<I, U, C>(users: I) -> Self
    where
        I: IntoIterator<Item = (U, C)>,
        U: Into<String>,
        C: Into<String>,
    {
        Self {
            users: users
                .into_iter()
                .map(|(u, c)| (UserId::new(u.into()), c.into()))
                .collect(),
            permissive: false,
        }
    }

    /// Loads a registry from a JSON file mapping user ids to credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| BerthError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let users: HashMap<String, String> = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.display(), count = users.len(), "user registry loaded");
        Ok(Self::with_users(users))
    }

    /// A registry that treats every user as existing. Credential checks
    /// still fail. Intended for local development without a user file.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            users: HashMap::new(),
            permissive: true,
        }
    }
}

impl Identity for StaticRegistry {
    fn exists(&self, user: &UserId) -> Result<bool> {
        Ok(self.permissive || self.users.contains_key(user))
    }

    fn verify(&self, user: &UserId, credential: &str) -> Result<bool> {
        Ok(self.users.get(user).is_some_and(|c| c == credential))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_user_exists_and_verifies() {
        let registry = StaticRegistry::with_users([("alice", "s3cret")]);
        let alice = UserId::new("alice");
        assert!(registry.exists(&alice).expect("exists"));
        assert!(registry.verify(&alice, "s3cret").expect("verify"));
        assert!(!registry.verify(&alice, "wrong").expect("verify"));
    }

    #[test]
    fn unknown_user_does_not_exist() {
        let registry = StaticRegistry::with_users([("alice", "s3cret")]);
        assert!(!registry.exists(&UserId::new("mallory")).expect("exists"));
    }

    #[test]
    fn permissive_registry_accepts_anyone_but_verifies_no_one() {
        let registry = StaticRegistry::permissive();
        let anyone = UserId::new("anyone");
        assert!(registry.exists(&anyone).expect("exists"));
        assert!(!registry.verify(&anyone, "anything").expect("verify"));
    }

    #[test]
    fn registry_loads_from_json_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("users.json");
        std::fs::write(&path, r#"{"alice": "s3cret", "bob": "hunter2"}"#).expect("write");
        let registry = StaticRegistry::from_file(&path).expect("load");
        assert!(registry.exists(&UserId::new("bob")).expect("exists"));
        assert!(!registry.exists(&UserId::new("eve")).expect("exists"));
    }
}
