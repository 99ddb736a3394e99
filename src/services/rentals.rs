//! Rental booking service

use chrono::{NaiveDate, Utc};

use crate::{
    config::SameDayPolicy,
    error::{AppError, AppResult},
    models::{
        listing::EquipmentListing,
        rental::{CreateRental, RentalConfirmation, RentalDetails, RentalQuote, RentalRecord, RentalStatus},
        session::Session,
    },
    repository::Repository,
    services::pricing,
};

/// Check that both dates are present and in order
pub fn validate_dates(request: &CreateRental) -> AppResult<(NaiveDate, NaiveDate)> {
    let (start, end) = match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AppError::Validation(
                "Please select both start and end dates".to_string(),
            ))
        }
    };

    if start > end {
        return Err(AppError::Validation(
            "End date must be after start date".to_string(),
        ));
    }

    Ok((start, end))
}

/// Check a booking request against a listing, stopping at the first failure.
/// Returns the validated (start, end) pair.
pub fn validate_rental(listing: &EquipmentListing, request: &CreateRental) -> AppResult<(NaiveDate, NaiveDate)> {
    let (start, end) = validate_dates(request)?;

    if listing.insurance_required && !request.accept_insurance {
        return Err(AppError::Validation(
            "Insurance is required for this equipment".to_string(),
        ));
    }

    Ok((start, end))
}

#[derive(Clone)]
pub struct RentalsService {
    repository: Repository,
    same_day_policy: SameDayPolicy,
}

impl RentalsService {
    pub fn new(repository: Repository, same_day_policy: SameDayPolicy) -> Self {
        Self {
            repository,
            same_day_policy,
        }
    }

    /// Price a date range for a listing without booking it
    pub async fn quote(&self, listing_id: i64, request: &CreateRental) -> AppResult<RentalQuote> {
        let listing = self.repository.listings.get_by_id(listing_id).await?.record;
        let (start, end) = validate_dates(request)?;
        pricing::quote(start, end, listing.daily_rate, self.same_day_policy)
    }

    /// Book a listing for the session user.
    ///
    /// Nothing is written unless every check passes. The returned confirmation
    /// is the completion signal for the caller.
    pub async fn book(&self, session: &Session, listing_id: i64, request: CreateRental) -> AppResult<RentalConfirmation> {
        let listing = self.repository.listings.get_by_id(listing_id).await?.record;
        let (start, end) = validate_rental(&listing, &request)?;
        let quote = pricing::quote(start, end, listing.daily_rate, self.same_day_policy)?;

        // No overlap check: concurrent bookings of the same window are accepted
        let rental = RentalRecord {
            id: Utc::now().timestamp_millis(),
            equipment_id: listing.id,
            equipment_name: listing.name.clone(),
            start_date: start,
            end_date: end,
            total_days: quote.total_days,
            total_cost: quote.total_cost,
            insurance_accepted: request.accept_insurance,
            renter_id: session.id.clone(),
            status: RentalStatus::Pending,
        };

        self.repository.rentals.create(&rental).await?;
        tracing::info!(
            "Rental {} booked by {} for listing {} ({} days, {})",
            rental.id,
            rental.renter_id,
            rental.equipment_id,
            rental.total_days,
            rental.total_cost
        );

        Ok(RentalConfirmation {
            details: RentalDetails {
                start_date: start,
                end_date: end,
                total_days: quote.total_days,
                total_cost: quote.total_cost,
                insurance_required: listing.insurance_required,
            },
            message: format!("{} booked successfully", listing.name),
            rental,
        })
    }

    /// Rentals booked by the session user
    pub async fn list_mine(&self, session: &Session) -> AppResult<Vec<RentalRecord>> {
        self.repository.rentals.list_for_renter(&session.id).await
    }
}
