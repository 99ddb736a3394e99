//! API handlers for Agrirent REST endpoints

pub mod health;
pub mod listings;
pub mod openapi;
pub mod rentals;
pub mod session;
pub mod storage;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::session::{Session, SessionClaims},
    AppState,
};

/// Extractor for the session carried by a bearer token
pub struct AuthenticatedUser(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = SessionClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims.session()))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Session
        .route("/session", get(session::current_session).post(session::create_session))
        // Listings
        .route("/listings", get(listings::list_listings).post(listings::create_listing))
        .route("/listings/:id", get(listings::get_listing).delete(listings::delete_listing))
        .route("/listings/:id/quote", post(rentals::quote_rental))
        .route("/listings/:id/rentals", post(rentals::create_rental))
        // Rentals
        .route("/rentals", get(rentals::list_my_rentals))
        // Storage dump
        .route(
            "/storage/snapshot",
            get(storage::export_snapshot).post(storage::import_snapshot),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
