//! Player Handlers

use axum::{extract::State, Json};

use crate::application::dto::response::ProfileResponse;
use crate::presentation::http::extractors::AuthIdentity;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Get the authenticated player's own profile
pub async fn get_me(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .players
        .find_by_identity(&identity)
        .await?
        .ok_or_else(|| AppError::NotFound("player profile not found".into()))?;

    Ok(Json(ProfileResponse::from_profile(profile)))
}
