//! Listings repository

use std::sync::Arc;

use super::{clear_slot, get_record, put_record, scan_slot, Versioned};
use crate::{
    error::{AppError, AppResult},
    models::listing::EquipmentListing,
    store::{Precondition, RecordStore, Revision, Slot, StoreError},
};

#[derive(Clone)]
pub struct ListingsRepository {
    store: Arc<dyn RecordStore>,
}

impl ListingsRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// List all listings in insertion order
    pub async fn list(&self) -> AppResult<Vec<EquipmentListing>> {
        let rows = scan_slot::<EquipmentListing>(self.store.as_ref(), Slot::EquipmentListings).await?;
        Ok(rows.into_iter().map(|v| v.record).collect())
    }

    /// Get listing by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Versioned<EquipmentListing>> {
        get_record(self.store.as_ref(), Slot::EquipmentListings, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Listing {} not found", id)))
    }

    /// Insert a new listing. The identifier must not be in use.
    pub async fn create(&self, listing: &EquipmentListing) -> AppResult<Revision> {
        put_record(
            self.store.as_ref(),
            Slot::EquipmentListings,
            listing.id,
            listing,
            Precondition::Absent,
        )
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("Listing identifier {} is already in use", listing.id))
            }
            other => other,
        })
    }

    /// Delete a listing, provided nobody wrote it since `revision` was read
    pub async fn delete(&self, id: i64, revision: Revision) -> AppResult<()> {
        let removed = self
            .store
            .delete(&Slot::EquipmentListings.key(id), Precondition::Revision(revision))
            .await
            .map_err(|e| match e {
                StoreError::RevisionMismatch { found: None, .. } => {
                    AppError::NotFound(format!("Listing {} not found", id))
                }
                other => other.into(),
            })?;
        if !removed {
            return Err(AppError::NotFound(format!("Listing {} not found", id)));
        }
        Ok(())
    }

    /// Replace the whole collection, keeping the given order
    pub async fn replace_all(&self, listings: &[EquipmentListing]) -> AppResult<()> {
        clear_slot(self.store.as_ref(), Slot::EquipmentListings).await?;
        for listing in listings {
            put_record(
                self.store.as_ref(),
                Slot::EquipmentListings,
                listing.id,
                listing,
                Precondition::Any,
            )
            .await?;
        }
        Ok(())
    }
}
