//! Agrirent Farm Equipment Rental Marketplace
//!
//! A REST JSON server for listing, browsing and renting farm equipment,
//! backed by a local keyed record store instead of a database.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub store: Arc<dyn store::RecordStore>,
}

impl AppState {
    /// Wire repository and services over an opened store
    pub fn new(config: AppConfig, store: Arc<dyn store::RecordStore>) -> Self {
        let repository = repository::Repository::new(store.clone());
        let services = services::Services::new(repository, &config.rentals);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            store,
        }
    }
}
