//! Storage dump endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    services::snapshot::{ImportReport, Snapshot},
};

use super::AuthenticatedUser;

/// Export the store in browser slot layout
#[utoipa::path(
    get,
    path = "/storage/snapshot",
    tag = "storage",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Slot name to serialized slot value", body = std::collections::HashMap<String, String>)
    )
)]
pub async fn export_snapshot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> AppResult<Json<Snapshot>> {
    tracing::info!("Storage snapshot exported by {}", session.id);
    let snapshot = state.services.snapshot.export().await?;
    Ok(Json(snapshot))
}

/// Replace the caller's records in the slots present in a browser dump
#[utoipa::path(
    post,
    path = "/storage/snapshot",
    tag = "storage",
    security(("bearer_auth" = [])),
    request_body = std::collections::HashMap<String, String>,
    responses(
        (status = 200, description = "Import summary", body = ImportReport),
        (status = 400, description = "Unknown or malformed slot"),
        (status = 403, description = "Dump carries records owned by another user"),
        (status = 409, description = "Duplicate identifiers in the dump")
    )
)]
pub async fn import_snapshot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Json(snapshot): Json<Snapshot>,
) -> AppResult<Json<ImportReport>> {
    tracing::info!("Storage snapshot import by {}", session.id);
    let report = state.services.snapshot.import(&session, &snapshot).await?;
    Ok(Json(report))
}
