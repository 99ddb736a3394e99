//! Session endpoints
//!
//! Sign-in happens elsewhere; once it knows who the user is, the client
//! exchanges that identity for a bearer token here.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::session::{Session, SessionClaims},
};

use super::AuthenticatedUser;

/// Token issued for a session
#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub session: Session,
}

/// Open a session
#[utoipa::path(
    post,
    path = "/session",
    tag = "session",
    request_body = Session,
    responses(
        (status = 201, description = "Session token issued", body = SessionResponse),
        (status = 400, description = "Empty user id")
    )
)]
pub async fn create_session(
    State(state): State<crate::AppState>,
    Json(session): Json<Session>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    if session.id.trim().is_empty() {
        return Err(AppError::BadRequest("User id is required".to_string()));
    }

    let hours = state.config.auth.jwt_expiration_hours;
    let token = SessionClaims::new(&session, hours)
        .create_token(&state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))?;

    tracing::debug!("Session opened for {}", session.id);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: hours * 3600,
            session,
        }),
    ))
}

/// Current session
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session behind the bearer token", body = Session),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn current_session(AuthenticatedUser(session): AuthenticatedUser) -> Json<Session> {
    Json(session)
}
