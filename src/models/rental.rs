//! Rental (booking) model and related types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rental lifecycle status. Bookings are created pending and nothing
/// transitions them further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    #[default]
    Pending,
}

/// Stored rental record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalRecord {
    pub id: i64,
    pub equipment_id: i64,
    /// Listing name at booking time
    pub equipment_name: String,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    pub total_days: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_cost: Decimal,
    pub insurance_accepted: bool,
    pub renter_id: String,
    #[serde(default)]
    pub status: RentalStatus,
}

/// Booking request as submitted from the rental form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRental {
    #[serde(default, with = "super::optional_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "super::optional_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub accept_insurance: bool,
}

/// Duration and price for a date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalQuote {
    pub total_days: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_cost: Decimal,
}

/// Summary shown to the renter once a booking is stored
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalDetails {
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    pub total_days: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_cost: Decimal,
    pub insurance_required: bool,
}

/// Returned when a booking completes; the caller decides when to dismiss it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalConfirmation {
    pub rental: RentalRecord,
    pub details: RentalDetails,
    pub message: String,
}
