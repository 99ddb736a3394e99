use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Entry, Precondition, RecordStore, Records, Revision, StoreResult};

/// In-memory RecordStore for testing and ephemeral deployments.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Records>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Entry>> {
        Ok(self.records.lock().unwrap().get(key))
    }

    async fn scan(&self, prefix: &str) -> StoreResult<Vec<(String, Entry)>> {
        Ok(self.records.lock().unwrap().scan(prefix))
    }

    async fn put(&self, key: &str, value: String, precondition: Precondition) -> StoreResult<Revision> {
        self.records.lock().unwrap().put(key, value, precondition)
    }

    async fn delete(&self, key: &str, precondition: Precondition) -> StoreResult<bool> {
        self.records.lock().unwrap().delete(key, precondition)
    }
}
