//! Listing API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::listing::{CreateListing, EquipmentListing, ListingQuery},
};

use super::AuthenticatedUser;

/// Delete query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteListingQuery {
    /// Must be true; stands for the user's confirmation
    pub confirm: Option<bool>,
}

/// Browse listings
#[utoipa::path(
    get,
    path = "/listings",
    tag = "listings",
    params(ListingQuery),
    responses(
        (status = 200, description = "Matching listings in stored order", body = Vec<EquipmentListing>)
    )
)]
pub async fn list_listings(
    State(state): State<crate::AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<EquipmentListing>>> {
    let listings = state.services.catalog.search(&query).await?;
    Ok(Json(listings))
}

/// Get listing by ID
#[utoipa::path(
    get,
    path = "/listings/{id}",
    tag = "listings",
    params(("id" = i64, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing details", body = EquipmentListing),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EquipmentListing>> {
    let listing = state.services.catalog.get(id).await?;
    Ok(Json(listing))
}

/// Submit a listing
#[utoipa::path(
    post,
    path = "/listings",
    tag = "listings",
    security(("bearer_auth" = [])),
    request_body = CreateListing,
    responses(
        (status = 201, description = "Listing created", body = EquipmentListing),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Not signed in"),
        (status = 409, description = "Identifier already in use")
    )
)]
pub async fn create_listing(
    State(state): State<crate::AppState>,
    user: Option<AuthenticatedUser>,
    Json(data): Json<CreateListing>,
) -> AppResult<(StatusCode, Json<EquipmentListing>)> {
    let session = user.map(|AuthenticatedUser(session)| session);
    let listing = state.services.listings.create(session.as_ref(), data).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// Delete a listing owned by the caller
#[utoipa::path(
    delete,
    path = "/listings/{id}",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Listing ID"),
        DeleteListingQuery
    ),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 400, description = "Deletion not confirmed"),
        (status = 403, description = "Listing owned by someone else"),
        (status = 404, description = "Listing not found"),
        (status = 409, description = "Listing changed since it was read")
    )
)]
pub async fn delete_listing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path(id): Path<i64>,
    Query(query): Query<DeleteListingQuery>,
) -> AppResult<StatusCode> {
    state
        .services
        .listings
        .delete(&session, id, query.confirm.unwrap_or(false))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
