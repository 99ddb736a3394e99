//! Business logic services

pub mod catalog;
pub mod listings;
pub mod pricing;
pub mod rentals;
pub mod snapshot;

use crate::{config::RentalsConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub listings: listings::ListingsService,
    pub rentals: rentals::RentalsService,
    pub snapshot: snapshot::SnapshotService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, rentals_config: &RentalsConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            listings: listings::ListingsService::new(repository.clone()),
            rentals: rentals::RentalsService::new(repository.clone(), rentals_config.same_day_policy),
            snapshot: snapshot::SnapshotService::new(repository),
        }
    }
}
