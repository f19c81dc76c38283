//! Process-local implementation of TokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::{ClientId, RefreshCredentialRecord};
use crate::errors::StoreError;

use super::r#trait::TokenRepository;

/// In-memory credential store
///
/// Records are lost when the process exits. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct InMemoryTokenRepository {
    records: Arc<RwLock<HashMap<ClientId, RefreshCredentialRecord>>>,
}

impl InMemoryTokenRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn create_if_absent(&self, record: RefreshCredentialRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        match records.entry(record.client_id.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateIdentifier),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn overwrite(
        &self,
        client_id: &ClientId,
        refresh_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        let record = records.get_mut(client_id).ok_or(StoreError::NotFound)?;
        record.refresh_hash = refresh_hash.to_string();
        record.expires_at = expires_at;
        Ok(())
    }

    async fn compare_and_overwrite(
        &self,
        client_id: &ClientId,
        expected_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;

        let record = records.get_mut(client_id).ok_or(StoreError::NotFound)?;
        if record.refresh_hash != expected_hash {
            return Ok(false);
        }
        record.refresh_hash = new_hash.to_string();
        record.expires_at = expires_at;
        Ok(true)
    }

    async fn lookup(&self, client_id: &ClientId) -> Result<Option<RefreshCredentialRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(client_id).cloned())
    }
}
