//! Import and export of browser storage dumps
//!
//! A dump maps slot names to the JSON *string* each slot holds, exactly as
//! browser local storage keeps them:
//!
//! ```json
//! { "equipmentListings": "[{\"id\":1,...}]", "rentals": "[]", "currentUser": "{\"id\":\"u1\"}" }
//! ```

use std::collections::HashSet;

use chrono::Utc;
use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        listing::{EquipmentListing, LegacyListing, ListingSchema},
        rental::RentalRecord,
        session::Session,
    },
    repository::Repository,
    store::Slot,
};

/// Slot name to serialized slot value
pub type Snapshot = IndexMap<String, String>;

/// What an import wrote
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ImportReport {
    pub listings: usize,
    pub legacy_listings: usize,
    pub rentals: usize,
    pub current_user: bool,
}

fn parse_slot<T: DeserializeOwned>(slot: Slot, raw: &str) -> AppResult<T> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::BadRequest(format!("Slot '{}' is not valid: {}", slot.name(), e)))
}

fn encode_slot<T: Serialize>(slot: Slot, value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("Failed to encode slot '{}': {}", slot.name(), e)))
}

#[derive(Clone)]
pub struct SnapshotService {
    repository: Repository,
}

impl SnapshotService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Dump the store in browser slot layout. Priced listings go back to the
    /// `equipment` slot in their original shape.
    pub async fn export(&self) -> AppResult<Snapshot> {
        let (daily, priced): (Vec<EquipmentListing>, Vec<EquipmentListing>) = self
            .repository
            .listings
            .list()
            .await?
            .into_iter()
            .partition(|l| l.schema == ListingSchema::Daily);
        let legacy: Vec<LegacyListing> = priced.iter().map(LegacyListing::from).collect();
        let rentals = self.repository.rentals.list().await?;

        let mut snapshot = Snapshot::new();
        snapshot.insert(
            Slot::EquipmentListings.name().to_string(),
            encode_slot(Slot::EquipmentListings, &daily)?,
        );
        if !legacy.is_empty() {
            snapshot.insert(Slot::Equipment.name().to_string(), encode_slot(Slot::Equipment, &legacy)?);
        }
        snapshot.insert(Slot::Rentals.name().to_string(), encode_slot(Slot::Rentals, &rentals)?);
        if let Some(raw) = self.repository.current_user_raw().await? {
            snapshot.insert(Slot::CurrentUser.name().to_string(), raw);
        }
        Ok(snapshot)
    }

    /// Replace the session user's records in every slot present in the dump.
    ///
    /// Listings and rentals belonging to other users are kept, and the dump
    /// may only carry records owned by the importer (ownerless legacy
    /// listings are adopted). Every slot is parsed and checked before
    /// anything is written, so a rejected dump leaves the store as it was.
    pub async fn import(&self, session: &Session, snapshot: &Snapshot) -> AppResult<ImportReport> {
        let mut daily: Option<Vec<EquipmentListing>> = None;
        let mut legacy: Option<Vec<LegacyListing>> = None;
        let mut rentals: Option<Vec<RentalRecord>> = None;
        let mut current_user: Option<String> = None;

        for (name, raw) in snapshot {
            let slot = Slot::from_name(name)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown storage slot '{}'", name)))?;
            match slot {
                Slot::EquipmentListings => daily = Some(parse_slot(slot, raw)?),
                Slot::Equipment => legacy = Some(parse_slot(slot, raw)?),
                Slot::Rentals => rentals = Some(parse_slot(slot, raw)?),
                Slot::CurrentUser => {
                    let user: Session = parse_slot(slot, raw)?;
                    if user.id != session.id {
                        return Err(AppError::Authorization(
                            "You can only import your own session".to_string(),
                        ));
                    }
                    current_user = Some(raw.clone());
                }
            }
        }

        let mut report = ImportReport::default();

        let listings = if daily.is_some() || legacy.is_some() {
            let now = Utc::now();
            let replaced_daily = daily.is_some();
            let replaced_priced = legacy.is_some();

            let mut imported: Vec<EquipmentListing> = Vec::new();
            if let Some(daily) = daily {
                report.listings = daily.len();
                imported.extend(daily.into_iter().map(|mut l| {
                    l.schema = ListingSchema::Daily;
                    l
                }));
            }
            if let Some(legacy) = legacy {
                report.legacy_listings = legacy.len();
                imported.extend(legacy.into_iter().map(|l| {
                    let mut listing = l.into_listing(now);
                    if listing.owner_id.is_empty() {
                        listing.owner_id = session.id.clone();
                    }
                    listing
                }));
            }
            if let Some(foreign) = imported.iter().find(|l| l.owner_id != session.id) {
                return Err(AppError::Authorization(format!(
                    "You can only import your own listings (listing {} belongs to another user)",
                    foreign.id
                )));
            }

            let mut listings: Vec<EquipmentListing> = self
                .repository
                .listings
                .list()
                .await?
                .into_iter()
                .filter(|l| {
                    let replaced = match l.schema {
                        ListingSchema::Daily => replaced_daily,
                        ListingSchema::Priced => replaced_priced,
                    };
                    !replaced || l.owner_id != session.id
                })
                .collect();
            listings.extend(imported);

            let mut seen = HashSet::new();
            if let Some(dup) = listings.iter().find(|l| !seen.insert(l.id)) {
                return Err(AppError::Conflict(format!(
                    "Listing identifier {} appears more than once",
                    dup.id
                )));
            }
            Some(listings)
        } else {
            None
        };

        let rentals = match rentals {
            Some(imported) => {
                if let Some(foreign) = imported.iter().find(|r| r.renter_id != session.id) {
                    return Err(AppError::Authorization(format!(
                        "You can only import your own rentals (rental {} belongs to another user)",
                        foreign.id
                    )));
                }
                report.rentals = imported.len();

                let mut rentals: Vec<RentalRecord> = self
                    .repository
                    .rentals
                    .list()
                    .await?
                    .into_iter()
                    .filter(|r| r.renter_id != session.id)
                    .collect();
                rentals.extend(imported);

                let mut seen = HashSet::new();
                if let Some(dup) = rentals.iter().find(|r| !seen.insert(r.id)) {
                    return Err(AppError::Conflict(format!(
                        "Rental identifier {} appears more than once",
                        dup.id
                    )));
                }
                Some(rentals)
            }
            None => None,
        };

        if let Some(listings) = listings {
            self.repository.listings.replace_all(&listings).await?;
        }
        if let Some(rentals) = rentals {
            self.repository.rentals.replace_all(&rentals).await?;
        }
        if let Some(raw) = current_user {
            self.repository.set_current_user_raw(raw).await?;
            report.current_user = true;
        }

        tracing::info!(
            "Imported {} listings, {} legacy listings, {} rentals for {}",
            report.listings,
            report.legacy_listings,
            report.rentals,
            session.id
        );
        Ok(report)
    }
}
