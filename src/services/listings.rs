//! Listing submission and owner-gated deletion

use chrono::Utc;
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        listing::{CreateListing, EquipmentListing, ListingSchema, STATUS_AVAILABLE},
        session::Session,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ListingsService {
    repository: Repository,
}

impl ListingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate a listing form and store it under a fresh timestamp identifier.
    ///
    /// Two submissions within the same millisecond produce the same identifier;
    /// the second is rejected with a conflict rather than renumbered.
    pub async fn create(&self, session: Option<&Session>, data: CreateListing) -> AppResult<EquipmentListing> {
        let session = session
            .filter(|s| !s.id.is_empty())
            .ok_or_else(|| AppError::Authentication("Please sign in to list equipment".to_string()))?;

        if data.name.is_empty() || data.description.is_empty() || data.daily_rate <= Decimal::ZERO {
            return Err(AppError::Validation("Please fill in all required fields".to_string()));
        }
        data.validate()?;

        let now = Utc::now();
        let listing = EquipmentListing {
            id: now.timestamp_millis(),
            schema: ListingSchema::Daily,
            name: data.name,
            description: data.description,
            daily_rate: data.daily_rate,
            deposit: data.deposit,
            images: data.images,
            insurance_required: data.insurance_required,
            condition: data.condition,
            specifications: data.specifications,
            available_from: data.available_from,
            available_to: data.available_to,
            location: None,
            owner_id: session.id.clone(),
            owner_name: Some(session.name.clone()).filter(|n| !n.is_empty()),
            created_at: now,
            status: STATUS_AVAILABLE.to_string(),
        };

        self.repository.listings.create(&listing).await?;
        tracing::info!("Listing {} created by {}", listing.id, listing.owner_id);
        Ok(listing)
    }

    /// Delete a listing owned by the session user.
    ///
    /// `confirmed` stands for the interactive confirmation; without it nothing is read or written.
    pub async fn delete(&self, session: &Session, id: i64, confirmed: bool) -> AppResult<()> {
        if !confirmed {
            return Err(AppError::BadRequest(
                "Deletion must be confirmed (confirm=true)".to_string(),
            ));
        }

        let current = self.repository.listings.get_by_id(id).await?;
        if current.record.owner_id != session.id {
            tracing::warn!("User {} tried to delete listing {} owned by {}", session.id, id, current.record.owner_id);
            return Err(AppError::Authorization(
                "You can only delete your own listings".to_string(),
            ));
        }

        self.repository.listings.delete(id, current.revision).await?;
        tracing::info!("Listing {} deleted by {}", id, session.id);
        Ok(())
    }
}
