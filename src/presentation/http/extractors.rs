//! Custom Extractors
//!
//! Axum extractors for authenticated routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::RequestPartsExt;
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::application::services::SessionError;
use crate::domain::Identity;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Identity behind the session token presented as a bearer credential
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub Identity);

impl FromRequestParts<AppState> for AuthIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthenticated("missing or malformed bearer token".into()))?;

        let identity = state
            .sessions
            .validate(bearer.token())
            .await
            .map_err(|e| match e {
                SessionError::Invalid => {
                    AppError::AuthenticationFailed("session token invalid or expired".into())
                }
                SessionError::Store(e) => AppError::StoreUnavailable(e.to_string()),
                SessionError::Internal(e) => AppError::Internal(e),
            })?;

        Ok(AuthIdentity(identity))
    }
}
