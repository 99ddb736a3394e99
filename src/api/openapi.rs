//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, listings, rentals, session, storage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agrirent API",
        version = "0.3.0",
        description = "Farm equipment rental marketplace REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Session
        session::create_session,
        session::current_session,
        // Listings
        listings::list_listings,
        listings::get_listing,
        listings::create_listing,
        listings::delete_listing,
        // Rentals
        rentals::quote_rental,
        rentals::create_rental,
        rentals::list_my_rentals,
        // Storage
        storage::export_snapshot,
        storage::import_snapshot,
    ),
    components(
        schemas(
            // Session
            crate::models::session::Session,
            session::SessionResponse,
            // Listings
            crate::models::listing::EquipmentListing,
            crate::models::listing::ListingSchema,
            crate::models::listing::CreateListing,
            crate::models::listing::PriceBucket,
            // Rentals
            crate::models::rental::RentalRecord,
            crate::models::rental::RentalStatus,
            crate::models::rental::CreateRental,
            crate::models::rental::RentalQuote,
            crate::models::rental::RentalDetails,
            crate::models::rental::RentalConfirmation,
            // Storage
            crate::services::snapshot::ImportReport,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Session tokens"),
        (name = "listings", description = "Equipment listings"),
        (name = "rentals", description = "Rental booking"),
        (name = "storage", description = "Browser storage import and export")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
