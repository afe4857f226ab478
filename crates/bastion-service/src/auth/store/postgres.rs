use std::collections::BTreeSet;

use salvo::async_trait;

use bastion_core::types::Role;
use bastion_db::db::{DbProvider, connection::DbPool, query::credentials};
use bastion_db::error::DbError;

use super::{CredentialBackend, CredentialRecord};
use crate::auth::password::HashedValue;
use crate::error::{ServiceError, ServiceResult};

/// Backend over the `users`/`authorities` tables.
///
/// Roles are stored as authority strings (`ROLE_USER`). Uniqueness of
/// usernames is enforced by the primary key, so concurrent inserts of one
/// username leave exactly one row.
pub struct PostgresBackend {
    pool: DbPool,
}

impl PostgresBackend {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: DbError) -> ServiceError {
    tracing::error!(error = %err, "Credential database error");
    ServiceError::StoreUnavailable(err.to_string())
}

#[async_trait]
impl CredentialBackend for PostgresBackend {
    async fn lookup(&self, username: &str) -> ServiceResult<CredentialRecord> {
        let mut conn = self.pool.get_connection().await.map_err(unavailable)?;

        let (user, authorities) = credentials::find_enabled_user(&mut conn, username)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| ServiceError::NotFound(format!("User {username}")))?;

        let roles: BTreeSet<Role> = authorities
            .iter()
            .filter_map(|row| match Role::from_authority(&row.authority) {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(username, authority = %row.authority, error = %e, "Ignoring unknown authority");
                    None
                }
            })
            .collect();

        Ok(CredentialRecord {
            username: user.username,
            password_hash: HashedValue::from_phc(user.password),
            roles,
        })
    }

    async fn insert(&self, record: CredentialRecord) -> ServiceResult<()> {
        let mut conn = self.pool.get_connection().await.map_err(unavailable)?;

        let authorities: Vec<String> = record.roles.iter().map(|role| role.authority()).collect();

        match credentials::insert_user_with_authorities(
            &mut conn,
            &record.username,
            record.password_hash.as_str(),
            &authorities,
        )
        .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_unique_violation() => Err(ServiceError::DuplicateUser(record.username)),
            Err(e) => Err(unavailable(e)),
        }
    }
}
