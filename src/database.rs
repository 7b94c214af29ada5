use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::weather::WeatherRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a record with id {0} already exists")]
    DuplicateId(String),
}

/// Keyed storage for weather records.
///
/// Records are written once and never changed afterwards.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, id: String, record: WeatherRecord) -> Result<(), StoreError>;
    async fn get(&self, id: &str) -> Result<Option<WeatherRecord>, StoreError>;
    /// Number of stored records, for inspecting the store.
    async fn len(&self) -> Result<usize, StoreError>;
}

/// Process-lifetime store. Nothing is ever written to disk.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<HashMap<String, WeatherRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert(&self, id: String, record: WeatherRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        records.insert(id, record);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<WeatherRecord>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.len())
    }
}
