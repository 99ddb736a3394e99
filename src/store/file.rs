//! Single-file JSON record store
//!
//! The whole record table (entries plus the revision counter) is kept in memory
//! and rewritten to disk after every successful mutation. The rewrite goes to a
//! sibling temp file that is then renamed over the target, so a crash leaves
//! either the old or the new table on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Entry, Precondition, RecordStore, Records, Revision, StoreError, StoreResult};

/// File-backed RecordStore that survives restarts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: Mutex<Records>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                key: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Records::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Opened record store at {}", path.display());

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &Records) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string(records).map_err(|source| StoreError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Entry>> {
        Ok(self.records.lock().await.get(key))
    }

    async fn scan(&self, prefix: &str) -> StoreResult<Vec<(String, Entry)>> {
        Ok(self.records.lock().await.scan(prefix))
    }

    async fn put(&self, key: &str, value: String, precondition: Precondition) -> StoreResult<Revision> {
        let mut records = self.records.lock().await;
        // Apply to a copy so a failed write leaves memory and disk in agreement
        let mut next = records.clone();
        let revision = next.put(key, value, precondition)?;
        self.persist(&next).await?;
        *records = next;
        Ok(revision)
    }

    async fn delete(&self, key: &str, precondition: Precondition) -> StoreResult<bool> {
        let mut records = self.records.lock().await;
        let mut next = records.clone();
        let removed = next.delete(key, precondition)?;
        if removed {
            self.persist(&next).await?;
            *records = next;
        }
        Ok(removed)
    }
}
