use std::collections::HashMap;
use std::collections::hash_map::Entry;

use salvo::async_trait;
use tokio::sync::RwLock;

use super::{CredentialBackend, CredentialRecord};
use crate::error::{ServiceError, ServiceResult};

/// Process-local backend. Lookups share a read lock; inserts take the write
/// lock, so the duplicate check and the insert cannot interleave.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

#[async_trait]
impl CredentialBackend for InMemoryBackend {
    async fn lookup(&self, username: &str) -> ServiceResult<CredentialRecord> {
        self.records
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("User {username}")))
    }

    async fn insert(&self, record: CredentialRecord) -> ServiceResult<()> {
        match self.records.write().await.entry(record.username.clone()) {
            Entry::Occupied(_) => Err(ServiceError::DuplicateUser(record.username)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }
}
