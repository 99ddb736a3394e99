//! Data models for Agrirent

pub mod listing;
pub mod rental;
pub mod session;

// Re-export commonly used types
pub use listing::{CreateListing, EquipmentListing, LegacyListing, ListingQuery, ListingSchema, PriceBucket};
pub use rental::{CreateRental, RentalConfirmation, RentalDetails, RentalQuote, RentalRecord, RentalStatus};
pub use session::{Session, SessionClaims};

/// Serde helpers for calendar dates submitted by HTML date inputs,
/// which send an empty string when nothing was picked.
pub(crate) mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            // Accept full ISO timestamps too; only the calendar day matters
            Some(s) => NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
