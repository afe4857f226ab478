use std::sync::Arc;

use super::{credentials::Credentials, principal::Principal, store::CredentialStore};
use crate::error::{ServiceError, ServiceResult};

/// Turns presented credentials into a [`Principal`].
///
/// Stateless: nothing is remembered between calls, so every request must
/// present credentials again.
pub struct RequestAuthenticator {
    store: Arc<CredentialStore>,
}

impl RequestAuthenticator {
    #[must_use]
    pub const fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    /// ## Summary
    /// Authenticates credentials against the credential store.
    ///
    /// An unknown username still pays for one password verification, and
    /// both failure modes produce the same `InvalidCredentials` error, so a
    /// caller cannot tell which usernames exist.
    ///
    /// ## Errors
    /// Returns `InvalidCredentials` for an unknown user or a wrong password,
    /// `StoreUnavailable` if the store or the hashing task fails.
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn authenticate(&self, credentials: &Credentials) -> ServiceResult<Principal> {
        let record = match self.store.lookup(credentials.username()).await {
            Ok(record) => Some(record),
            Err(ServiceError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        let hasher = Arc::clone(self.store.hasher());
        let password = credentials.password().to_string();
        let (verified, record) = tokio::task::spawn_blocking(move || {
            let verified = match &record {
                Some(record) => hasher.verify(&password, &record.password_hash),
                None => {
                    hasher.dummy_verify(&password);
                    false
                }
            };
            (verified, record)
        })
        .await
        .map_err(|e| ServiceError::StoreUnavailable(format!("Verification task failed: {e}")))?;

        match record {
            Some(record) if verified => {
                tracing::debug!(roles = ?record.roles, "Authenticated");
                Ok(Principal::new(record.username, record.roles))
            }
            Some(_) => {
                tracing::debug!("Password mismatch");
                Err(ServiceError::InvalidCredentials)
            }
            None => {
                tracing::debug!("Unknown username");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }
}
