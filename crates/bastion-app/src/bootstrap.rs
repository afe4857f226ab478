//! Process-start composition.
//!
//! Everything is built in dependency order and handed on explicitly:
//! hasher, then store, then seed users, then policy and authenticator.

use std::sync::Arc;

use bastion_core::config::{SeedUserConfig, Settings, StoreBackend};
use bastion_core::error::CoreError;
use bastion_db::db::connection::{create_pool, run_migrations};
use bastion_service::auth::{
    AuthorizationPolicy, CredentialStore, HashedValue, PasswordHasher, PostgresBackend,
    RequestAuthenticator,
};
use bastion_service::error::ServiceError;

use crate::error::{AppError, AppResult};

/// The wired security components shared by every request.
#[derive(Clone)]
pub struct Security {
    pub store: Arc<CredentialStore>,
    pub authenticator: Arc<RequestAuthenticator>,
    pub policy: Arc<AuthorizationPolicy>,
}

impl Security {
    /// ## Summary
    /// Wires already-built components together.
    #[must_use]
    pub fn new(store: Arc<CredentialStore>, policy: AuthorizationPolicy) -> Self {
        Self {
            authenticator: Arc::new(RequestAuthenticator::new(Arc::clone(&store))),
            store,
            policy: Arc::new(policy),
        }
    }
}

/// ## Summary
/// Builds the security components described by `settings`.
///
/// ## Side Effects
/// - For the postgres backend: creates the pool and runs pending migrations
/// - Provisions every configured seed user
///
/// ## Errors
/// Returns an error if the hasher or policy configuration is invalid, the
/// store cannot be reached, or a seed user cannot be created.
#[tracing::instrument(skip(settings))]
pub async fn build_security(settings: &Settings) -> AppResult<Security> {
    let hasher = Arc::new(PasswordHasher::new(&settings.hasher)?);
    let store = Arc::new(build_store(settings, hasher).await?);

    seed_users(&store, &settings.users).await?;

    let policy = AuthorizationPolicy::from_config(&settings.policy)?;

    Ok(Security::new(store, policy))
}

async fn build_store(
    settings: &Settings,
    hasher: Arc<PasswordHasher>,
) -> AppResult<CredentialStore> {
    match settings.store.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory credential store");
            Ok(CredentialStore::in_memory(hasher))
        }
        StoreBackend::Postgres => {
            let url = settings.store.url.as_deref().ok_or_else(|| {
                AppError::CoreError(CoreError::ConfigError(
                    "store.url is required for the postgres backend".to_string(),
                ))
            })?;

            run_migrations(url).await?;
            let pool = create_pool(url, u32::from(settings.store.max_connections)).await?;

            tracing::info!("Using PostgreSQL credential store");
            Ok(CredentialStore::new(Arc::new(PostgresBackend::new(pool)), hasher))
        }
    }
}

/// ## Summary
/// Provisions the configured users. Users that already exist (a persistent
/// store across restarts) are left untouched.
///
/// ## Errors
/// Returns the first error other than `DuplicateUser`.
pub async fn seed_users(store: &CredentialStore, users: &[SeedUserConfig]) -> AppResult<()> {
    for user in users {
        let result = match (&user.password, &user.password_hash) {
            (_, Some(hash)) => {
                store
                    .create_prehashed(
                        &user.username,
                        HashedValue::from_phc(hash.as_str()),
                        user.roles.clone(),
                    )
                    .await
            }
            (Some(password), None) => {
                store
                    .create(&user.username, password, user.roles.clone())
                    .await
            }
            (None, None) => Err(ServiceError::MalformedInput(format!(
                "Seed user {} has no password",
                user.username
            ))),
        };

        match result {
            Ok(_) => {}
            Err(ServiceError::DuplicateUser(username)) => {
                tracing::info!(%username, "Seed user already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(count = users.len(), "Seed users provisioned");
    Ok(())
}
