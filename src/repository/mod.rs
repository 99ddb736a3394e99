//! Repository layer over the record store

pub mod listings;
pub mod rentals;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::AppResult,
    store::{self, Precondition, RecordStore, Revision, Slot},
};

/// A record together with the store revision it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub revision: Revision,
    pub record: T,
}

/// Main repository struct holding the record store
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn RecordStore>,
    pub listings: listings::ListingsRepository,
    pub rentals: rentals::RentalsRepository,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            listings: listings::ListingsRepository::new(store.clone()),
            rentals: rentals::RentalsRepository::new(store.clone()),
            store,
        }
    }

    /// Raw `currentUser` value, as imported from a browser dump
    pub async fn current_user_raw(&self) -> AppResult<Option<String>> {
        let entry = self.store.get(Slot::CurrentUser.name()).await?;
        Ok(entry.map(|e| e.value))
    }

    pub async fn set_current_user_raw(&self, value: String) -> AppResult<()> {
        self.store
            .put(Slot::CurrentUser.name(), value, Precondition::Any)
            .await?;
        Ok(())
    }
}

/// Decode every record of a collection slot, in stored order
async fn scan_slot<T: DeserializeOwned>(
    store: &dyn RecordStore,
    slot: Slot,
) -> AppResult<Vec<Versioned<T>>> {
    let mut records = Vec::new();
    for (key, entry) in store.scan(&slot.prefix()).await? {
        records.push(Versioned {
            revision: entry.revision,
            record: store::decode(&key, &entry)?,
        });
    }
    Ok(records)
}

async fn get_record<T: DeserializeOwned>(
    store: &dyn RecordStore,
    slot: Slot,
    id: i64,
) -> AppResult<Option<Versioned<T>>> {
    let key = slot.key(id);
    match store.get(&key).await? {
        Some(entry) => Ok(Some(Versioned {
            revision: entry.revision,
            record: store::decode(&key, &entry)?,
        })),
        None => Ok(None),
    }
}

async fn put_record<T: Serialize>(
    store: &dyn RecordStore,
    slot: Slot,
    id: i64,
    record: &T,
    precondition: Precondition,
) -> AppResult<Revision> {
    let key = slot.key(id);
    let value = store::encode(&key, record)?;
    Ok(store.put(&key, value, precondition).await?)
}

/// Drop every record of a collection slot
async fn clear_slot(store: &dyn RecordStore, slot: Slot) -> AppResult<usize> {
    let keys = store.scan(&slot.prefix()).await?;
    let count = keys.len();
    for (key, _) in keys {
        store.delete(&key, Precondition::Any).await?;
    }
    Ok(count)
}
