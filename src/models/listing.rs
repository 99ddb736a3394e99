//! Equipment listing model and related types
//!
//! Two record shapes exist in stored data: the current daily-rate form
//! (`dailyRate`, `insuranceRequired`, availability window) and an older
//! priced form (`price`, `location`, `imageUrl`). Both are held as
//! [`EquipmentListing`]; the [`ListingSchema`] tag records which one a
//! listing came from.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Status written on every new listing
pub const STATUS_AVAILABLE: &str = "available";

/// Which stored shape a listing originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingSchema {
    /// dailyRate / deposit / insurance / availability window
    #[default]
    Daily,
    /// Legacy price / location / imageUrl
    Priced,
}

/// Equipment offered for rent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentListing {
    /// Millisecond timestamp of creation
    pub id: i64,
    #[serde(default)]
    pub schema: ListingSchema,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub daily_rate: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub deposit: Decimal,
    /// Image URLs or data URLs, first one is the cover
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub insurance_required: bool,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub specifications: String,
    #[serde(default, with = "super::optional_date", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Date)]
    pub available_from: Option<NaiveDate>,
    #[serde(default, with = "super::optional_date", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Date)]
    pub available_to: Option<NaiveDate>,
    /// Only set on legacy priced listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// Listing in the older priced shape, as found under the `equipment` slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyListing {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl LegacyListing {
    /// Lift into the unified shape. `fallback_created_at` is used when the
    /// legacy record carries no creation time.
    pub fn into_listing(self, fallback_created_at: DateTime<Utc>) -> EquipmentListing {
        EquipmentListing {
            id: self.id,
            schema: ListingSchema::Priced,
            name: self.name,
            description: self.description,
            daily_rate: self.price,
            deposit: Decimal::ZERO,
            images: if self.image_url.is_empty() {
                Vec::new()
            } else {
                vec![self.image_url]
            },
            insurance_required: false,
            condition: String::new(),
            specifications: String::new(),
            available_from: None,
            available_to: None,
            location: Some(self.location),
            owner_id: self.owner_id,
            owner_name: self.owner_name,
            created_at: self.created_at.unwrap_or(fallback_created_at),
            status: self.status.unwrap_or_else(|| STATUS_AVAILABLE.to_string()),
        }
    }
}

impl From<&EquipmentListing> for LegacyListing {
    fn from(listing: &EquipmentListing) -> Self {
        Self {
            id: listing.id,
            name: listing.name.clone(),
            description: listing.description.clone(),
            price: listing.daily_rate,
            location: listing.location.clone().unwrap_or_default(),
            image_url: listing.images.first().cloned().unwrap_or_default(),
            owner_id: listing.owner_id.clone(),
            owner_name: listing.owner_name.clone(),
            created_at: Some(listing.created_at),
            status: Some(listing.status.clone()),
        }
    }
}

/// Price range selector used by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PriceBucket {
    #[default]
    All,
    /// daily rate <= 100
    Low,
    /// 100 < daily rate <= 500
    Medium,
    /// daily rate > 500
    High,
}

impl PriceBucket {
    pub fn contains(self, daily_rate: Decimal) -> bool {
        let hundred = Decimal::from(100);
        let five_hundred = Decimal::from(500);
        match self {
            PriceBucket::All => true,
            PriceBucket::Low => daily_rate <= hundred,
            PriceBucket::Medium => daily_rate > hundred && daily_rate <= five_hundred,
            PriceBucket::High => daily_rate > five_hundred,
        }
    }
}

impl From<&str> for PriceBucket {
    /// Unrecognised selectors do not filter
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => PriceBucket::Low,
            "medium" => PriceBucket::Medium,
            "high" => PriceBucket::High,
            _ => PriceBucket::All,
        }
    }
}

/// Catalog query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListingQuery {
    /// Case-insensitive text matched against name and description
    pub search: Option<String>,
    /// Price bucket: all, low, medium, high
    pub price: Option<String>,
}

impl ListingQuery {
    pub fn bucket(&self) -> PriceBucket {
        self.price.as_deref().map(PriceBucket::from).unwrap_or_default()
    }
}

fn default_insurance_required() -> bool {
    true
}

/// Largest daily rate or deposit a form may carry
pub const MAX_AMOUNT: i64 = 1_000_000_000;

fn amount_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn daily_rate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::from(MAX_AMOUNT) {
        return Err(amount_error("max_amount", "Daily rate is too large"));
    }
    Ok(())
}

fn deposit_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(amount_error("non_negative", "Deposit cannot be negative"));
    }
    if *value > Decimal::from(MAX_AMOUNT) {
        return Err(amount_error("max_amount", "Deposit is too large"));
    }
    Ok(())
}

/// Create listing request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListing {
    #[serde(default)]
    #[validate(length(max = 200, message = "Name must be at most 200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    #[validate(custom(function = "daily_rate_amount"))]
    pub daily_rate: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    #[validate(custom(function = "deposit_amount"))]
    pub deposit: Decimal,
    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 images per listing"))]
    pub images: Vec<String>,
    #[serde(default = "default_insurance_required")]
    pub insurance_required: bool,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub specifications: String,
    #[serde(default, with = "super::optional_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub available_from: Option<NaiveDate>,
    #[serde(default, with = "super::optional_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub available_to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_price_bucket_bounds() {
        let d = |s: &str| Decimal::from_str(s).unwrap();

        assert!(PriceBucket::Low.contains(d("100")));
        assert!(!PriceBucket::Low.contains(d("100.01")));
        assert!(PriceBucket::Medium.contains(d("100.01")));
        assert!(PriceBucket::Medium.contains(d("500")));
        assert!(!PriceBucket::Medium.contains(d("100")));
        assert!(PriceBucket::High.contains(d("500.5")));
        assert!(!PriceBucket::High.contains(d("500")));
        assert!(PriceBucket::All.contains(d("0")));
    }

    #[test]
    fn test_price_bucket_parse() {
        assert_eq!(PriceBucket::from("low"), PriceBucket::Low);
        assert_eq!(PriceBucket::from("HIGH"), PriceBucket::High);
        assert_eq!(PriceBucket::from("medium"), PriceBucket::Medium);
        assert_eq!(PriceBucket::from("cheap"), PriceBucket::All);
        assert_eq!(ListingQuery::default().bucket(), PriceBucket::All);
    }

    #[test]
    fn test_listing_reads_browser_shape() {
        let json = r#"{
            "id": 1718000000000,
            "name": "John Deere 6120M",
            "description": "Tractor",
            "dailyRate": 350,
            "deposit": 1000,
            "images": [],
            "insuranceRequired": true,
            "condition": "good",
            "specifications": "",
            "availableFrom": "2024-06-01",
            "availableTo": "2024-09-30",
            "ownerId": "u1",
            "ownerName": "Ada",
            "createdAt": "2024-06-10T06:13:20.000Z",
            "status": "available"
        }"#;

        let listing: EquipmentListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.schema, ListingSchema::Daily);
        assert_eq!(listing.daily_rate, Decimal::from(350));
        assert_eq!(listing.available_to, NaiveDate::from_ymd_opt(2024, 9, 30));

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["dailyRate"], serde_json::json!(350.0));
        assert_eq!(value["ownerId"], "u1");
        assert!(value.get("location").is_none());
    }

    #[test]
    fn test_legacy_listing_conversion() {
        let legacy: LegacyListing = serde_json::from_str(
            r#"{"id": 5, "name": "Baler", "price": 80, "location": "Ames", "imageUrl": "http://img/1.jpg"}"#,
        )
        .unwrap();

        let listing = legacy.clone().into_listing(Utc::now());
        assert_eq!(listing.schema, ListingSchema::Priced);
        assert_eq!(listing.daily_rate, Decimal::from(80));
        assert_eq!(listing.images, vec!["http://img/1.jpg".to_string()]);
        assert_eq!(listing.location.as_deref(), Some("Ames"));
        assert_eq!(listing.status, STATUS_AVAILABLE);

        let back = LegacyListing::from(&listing);
        assert_eq!(back.price, legacy.price);
        assert_eq!(back.image_url, legacy.image_url);
        assert_eq!(back.location, legacy.location);
    }

    #[test]
    fn test_create_listing_defaults_and_rules() {
        let form: CreateListing = serde_json::from_str(r#"{"name": "Plow", "dailyRate": 40}"#).unwrap();
        assert!(form.insurance_required);
        assert!(form.validate().is_ok());

        let form: CreateListing =
            serde_json::from_str(r#"{"name": "Plow", "dailyRate": 40, "deposit": -5}"#).unwrap();
        assert!(form.validate().is_err());

        let form: CreateListing = serde_json::from_str(r#"{"name": "Plow", "dailyRate": 1e28}"#).unwrap();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("daily_rate"));

        let form: CreateListing =
            serde_json::from_str(r#"{"name": "Plow", "dailyRate": 40, "deposit": 2e9}"#).unwrap();
        assert!(form.validate().is_err());

        let form: CreateListing =
            serde_json::from_str(r#"{"name": "Plow", "dailyRate": 1000000000, "deposit": 1000000000}"#).unwrap();
        assert!(form.validate().is_ok());
    }
}
