//! Local record store
//!
//! A process-local key/value store standing in for browser local storage.
//! Values are serialized JSON strings. Every key carries a revision taken from
//! a store-wide counter, and every write states a [`Precondition`] so a
//! read-modify-write that lost a race is reported instead of silently
//! overwriting the other writer.
//!
//! ## Key layout
//!
//! ```text
//! equipmentListings/<id>   # one listing record
//! equipment/<id>           # legacy-shape listing record (import only)
//! rentals/<id>             # one rental record
//! currentUser              # raw session object from an imported dump
//! ```

pub mod file;
pub mod memory;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

pub type Revision = u64;

/// A stored value together with the revision that wrote it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub revision: Revision,
    pub value: String,
}

/// Condition a write must satisfy against the current state of its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Last writer wins
    Any,
    /// Key must not exist yet
    Absent,
    /// Key must still be at this revision
    Revision(Revision),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("revision mismatch on '{key}': expected {expected:?}, found {found:?}")]
    RevisionMismatch {
        key: String,
        expected: Precondition,
        found: Option<Revision>,
    },

    #[error("corrupt record at '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed record storage backend
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read a single key
    async fn get(&self, key: &str) -> StoreResult<Option<Entry>>;

    /// All keys starting with `prefix`, in insertion order
    async fn scan(&self, prefix: &str) -> StoreResult<Vec<(String, Entry)>>;

    /// Write a key, returning the new revision
    async fn put(&self, key: &str, value: String, precondition: Precondition) -> StoreResult<Revision>;

    /// Remove a key. Returns false if it was not present and the precondition allowed that.
    async fn delete(&self, key: &str, precondition: Precondition) -> StoreResult<bool>;
}

/// Top-level slot names inherited from the browser storage layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    EquipmentListings,
    Equipment,
    Rentals,
    CurrentUser,
}

impl Slot {
    pub const ALL: [Slot; 4] = [
        Slot::EquipmentListings,
        Slot::Equipment,
        Slot::Rentals,
        Slot::CurrentUser,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Slot::EquipmentListings => "equipmentListings",
            Slot::Equipment => "equipment",
            Slot::Rentals => "rentals",
            Slot::CurrentUser => "currentUser",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    /// Prefix shared by every record of a collection slot
    pub fn prefix(self) -> String {
        format!("{}/", self.name())
    }

    pub fn key(self, id: i64) -> String {
        format!("{}/{}", self.name(), id)
    }
}

/// Deserialize a stored entry, reporting the key on failure
pub fn decode<T: DeserializeOwned>(key: &str, entry: &Entry) -> StoreResult<T> {
    serde_json::from_str(&entry.value).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })
}

pub fn encode<T: Serialize>(key: &str, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}

/// In-memory record table shared by the backends
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct Records {
    revision: Revision,
    entries: IndexMap<String, Entry>,
}

impl Records {
    fn check(&self, key: &str, precondition: Precondition) -> StoreResult<()> {
        let found = self.entries.get(key).map(|e| e.revision);
        let ok = match precondition {
            Precondition::Any => true,
            Precondition::Absent => found.is_none(),
            Precondition::Revision(expected) => found == Some(expected),
        };
        if ok {
            Ok(())
        } else {
            Err(StoreError::RevisionMismatch {
                key: key.to_string(),
                expected: precondition,
                found,
            })
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<Entry> {
        self.entries.get(key).cloned()
    }

    pub(crate) fn scan(&self, prefix: &str) -> Vec<(String, Entry)> {
        self.entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, e)| (k.clone(), e.clone()))
            .collect()
    }

    pub(crate) fn put(&mut self, key: &str, value: String, precondition: Precondition) -> StoreResult<Revision> {
        self.check(key, precondition)?;
        self.revision += 1;
        let entry = Entry {
            revision: self.revision,
            value,
        };
        // Overwrites keep the key's original position
        self.entries.insert(key.to_string(), entry);
        Ok(self.revision)
    }

    pub(crate) fn delete(&mut self, key: &str, precondition: Precondition) -> StoreResult<bool> {
        self.check(key, precondition)?;
        Ok(self.entries.shift_remove(key).is_some())
    }
}
