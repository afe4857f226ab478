//! Credential storage.
//!
//! [`CredentialStore`] owns every [`CredentialRecord`]. It hashes passwords
//! before they reach a [`CredentialBackend`], which only persists and looks up
//! finished records.

pub mod memory;
pub mod postgres;

use std::collections::BTreeSet;
use std::sync::Arc;

use salvo::async_trait;

use bastion_core::constants::MAX_USERNAME_LENGTH;
use bastion_core::types::Role;

use super::password::{HashedValue, PasswordHasher};
use crate::error::{ServiceError, ServiceResult};

pub use memory::InMemoryBackend;
pub use postgres::PostgresBackend;

/// A provisioned account: unique username, password hash and roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: HashedValue,
    pub roles: BTreeSet<Role>,
}

/// Persistence primitive behind a [`CredentialStore`].
///
/// Implementations must allow concurrent lookups and must make the
/// duplicate check and the write of `insert` atomic.
#[async_trait]
pub trait CredentialBackend: Send + Sync {
    /// ## Errors
    /// Returns `NotFound` if no record exists, `StoreUnavailable` on backend faults.
    async fn lookup(&self, username: &str) -> ServiceResult<CredentialRecord>;

    /// ## Errors
    /// Returns `DuplicateUser` if the username exists, `StoreUnavailable` on backend faults.
    async fn insert(&self, record: CredentialRecord) -> ServiceResult<()>;
}

pub struct CredentialStore {
    backend: Arc<dyn CredentialBackend>,
    hasher: Arc<PasswordHasher>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(backend: Arc<dyn CredentialBackend>, hasher: Arc<PasswordHasher>) -> Self {
        Self { backend, hasher }
    }

    /// ## Summary
    /// Store backed by process memory.
    #[must_use]
    pub fn in_memory(hasher: Arc<PasswordHasher>) -> Self {
        Self::new(Arc::new(InMemoryBackend::default()), hasher)
    }

    #[must_use]
    pub const fn hasher(&self) -> &Arc<PasswordHasher> {
        &self.hasher
    }

    /// ## Summary
    /// Looks up a record by username.
    ///
    /// ## Errors
    /// Returns `NotFound` if the user does not exist, `StoreUnavailable` on backend faults.
    #[tracing::instrument(skip(self))]
    pub async fn lookup(&self, username: &str) -> ServiceResult<CredentialRecord> {
        self.backend.lookup(username).await
    }

    /// ## Summary
    /// Hashes `password` and persists a new record.
    ///
    /// Hashing runs on a blocking thread before the backend is touched, so
    /// the backend's write serialization never waits on Argon2.
    ///
    /// ## Errors
    /// Returns `MalformedInput` for an empty or over-long username, a username
    /// containing `:` or an empty role set; `DuplicateUser` if the username is taken;
    /// `StoreUnavailable` on hashing or backend faults.
    #[tracing::instrument(skip(self, password))]
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        roles: BTreeSet<Role>,
    ) -> ServiceResult<CredentialRecord> {
        validate_account(username, &roles)?;

        let hasher = Arc::clone(&self.hasher);
        let plaintext = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| ServiceError::StoreUnavailable(format!("Hashing task failed: {e}")))??;

        self.persist(username, password_hash, roles).await
    }

    /// ## Summary
    /// Persists a new record whose password was hashed elsewhere, e.g. with
    /// the `hash_password` binary.
    ///
    /// ## Errors
    /// As [`create`](Self::create), plus `MalformedInput` if `password_hash`
    /// carries no algorithm tag.
    #[tracing::instrument(skip(self, password_hash))]
    pub async fn create_prehashed(
        &self,
        username: &str,
        password_hash: HashedValue,
        roles: BTreeSet<Role>,
    ) -> ServiceResult<CredentialRecord> {
        validate_account(username, &roles)?;
        if password_hash.algorithm().is_none() {
            return Err(ServiceError::MalformedInput(format!(
                "Password hash for {username} is not in PHC format"
            )));
        }

        self.persist(username, password_hash, roles).await
    }

    async fn persist(
        &self,
        username: &str,
        password_hash: HashedValue,
        roles: BTreeSet<Role>,
    ) -> ServiceResult<CredentialRecord> {
        let record = CredentialRecord {
            username: username.to_string(),
            password_hash,
            roles,
        };

        self.backend.insert(record.clone()).await?;

        tracing::info!(username = %record.username, roles = ?record.roles, "User created");

        Ok(record)
    }
}

fn validate_account(username: &str, roles: &BTreeSet<Role>) -> ServiceResult<()> {
    if username.is_empty() {
        return Err(ServiceError::MalformedInput("Username must not be empty".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ServiceError::MalformedInput(format!(
            "Username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    // Basic credentials cannot carry a ':' in the username.
    if username.contains(':') {
        return Err(ServiceError::MalformedInput(format!(
            "Username must not contain ':': {username}"
        )));
    }
    if roles.is_empty() {
        return Err(ServiceError::MalformedInput(format!(
            "User {username} must have at least one role"
        )));
    }
    Ok(())
}
