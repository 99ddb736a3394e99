//! Rental booking endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::rental::{CreateRental, RentalConfirmation, RentalQuote, RentalRecord},
};

use super::AuthenticatedUser;

/// Price a date range for a listing
#[utoipa::path(
    post,
    path = "/listings/{id}/quote",
    tag = "rentals",
    params(("id" = i64, Path, description = "Listing ID")),
    request_body = CreateRental,
    responses(
        (status = 200, description = "Duration and cost", body = RentalQuote),
        (status = 400, description = "Missing or reversed dates"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn quote_rental(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CreateRental>,
) -> AppResult<Json<RentalQuote>> {
    let quote = state.services.rentals.quote(id, &request).await?;
    Ok(Json(quote))
}

/// Book a listing
#[utoipa::path(
    post,
    path = "/listings/{id}/rentals",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Listing ID")),
    request_body = CreateRental,
    responses(
        (status = 201, description = "Rental booked", body = RentalConfirmation),
        (status = 400, description = "Invalid dates or insurance not accepted"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn create_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<CreateRental>,
) -> AppResult<(StatusCode, Json<RentalConfirmation>)> {
    let confirmation = state.services.rentals.book(&session, id, request).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// Rentals booked by the caller
#[utoipa::path(
    get,
    path = "/rentals",
    tag = "rentals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's rentals", body = Vec<RentalRecord>)
    )
)]
pub async fn list_my_rentals(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> AppResult<Json<Vec<RentalRecord>>> {
    let rentals = state.services.rentals.list_mine(&session).await?;
    Ok(Json(rentals))
}
