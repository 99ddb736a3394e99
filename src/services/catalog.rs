//! Listing catalog: read and filter

use crate::{
    error::AppResult,
    models::listing::{EquipmentListing, ListingQuery, PriceBucket},
    repository::Repository,
};

/// Keep the listings whose name or description contains `term`
/// (case-insensitive) and whose daily rate falls in `bucket`.
/// Relative order is preserved; an empty term matches everything.
pub fn filter_listings(
    listings: Vec<EquipmentListing>,
    term: &str,
    bucket: PriceBucket,
) -> Vec<EquipmentListing> {
    let term = term.to_lowercase();
    listings
        .into_iter()
        .filter(|l| {
            l.name.to_lowercase().contains(&term) || l.description.to_lowercase().contains(&term)
        })
        .filter(|l| bucket.contains(l.daily_rate))
        .collect()
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search listings with filters
    pub async fn search(&self, query: &ListingQuery) -> AppResult<Vec<EquipmentListing>> {
        let listings = self.repository.listings.list().await?;
        let total = listings.len();
        let found = filter_listings(listings, query.search.as_deref().unwrap_or(""), query.bucket());
        tracing::debug!("Catalog search matched {} of {} listings", found.len(), total);
        Ok(found)
    }

    /// Get listing by ID
    pub async fn get(&self, id: i64) -> AppResult<EquipmentListing> {
        Ok(self.repository.listings.get_by_id(id).await?.record)
    }
}
