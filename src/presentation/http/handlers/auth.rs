//! Authentication Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::application::dto::request::AuthRequest;
use crate::application::dto::response::AuthResponse;
use crate::application::services::{AuthError, AuthService, SessionError};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Exchange an external provider credential for a session token.
///
/// Verifies the credential with the identity provider, provisions the player
/// profile on first sight, and issues a fresh session token. A missing or
/// unparseable request body is rejected before any outbound call is made,
/// through the same `{"kind", "message"}` body as every other failure.
pub async fn authenticate(
    State(state): State<AppState>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(body) = body?;
    let credential = body.credential().ok_or(AppError::MissingCredential)?;

    let auth_service = AuthService::new(
        state.verifier.clone(),
        state.players.clone(),
        state.sessions.clone(),
    );

    let authenticated = auth_service
        .authenticate(credential)
        .await
        .map_err(map_auth_error)?;

    metrics::record_session_issued();

    Ok(Json(AuthResponse::from(authenticated)))
}

/// Revoke the presented session token.
///
/// Absent and malformed `Authorization` headers fail identically.
pub async fn logout(
    State(state): State<AppState>,
    authorization: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
) -> Result<StatusCode, AppError> {
    let TypedHeader(Authorization(bearer)) = authorization
        .map_err(|_| AppError::Unauthenticated("missing or malformed bearer token".into()))?;

    match state.sessions.revoke(bearer.token()).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(SessionError::Invalid) => Err(AppError::AuthenticationFailed(
            "session token invalid or expired".into(),
        )),
        Err(SessionError::Store(e)) => Err(AppError::StoreUnavailable(e.to_string())),
        Err(SessionError::Internal(e)) => Err(AppError::Internal(e)),
    }
}

/// Map authentication stage failures onto the wire taxonomy.
///
/// Every verification failure surfaces as `authentication_failed` regardless
/// of cause; the cause is logged where it occurs. Store failures stay
/// distinct so clients know a retry may succeed.
fn map_auth_error(error: AuthError) -> AppError {
    match error {
        AuthError::Verification(e) => AppError::AuthenticationFailed(e.to_string()),
        AuthError::Store(e) => AppError::StoreUnavailable(e.to_string()),
        AuthError::Internal(e) => AppError::Internal(e),
    }
}
