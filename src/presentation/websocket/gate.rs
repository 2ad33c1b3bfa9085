//! Connection Gate
//!
//! Session token check at connection-open time. The token travels as a query
//! parameter on the upgrade request; a missing or invalid token turns the
//! upgrade into an HTTP error response, so no socket state ever exists for
//! an unauthenticated client. Once the upgrade is accepted, the identity is
//! bound to the connection for its whole lifetime.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;

use super::handler::handle_socket;
use crate::application::services::SessionError;
use crate::shared::AppError;
use crate::startup::AppState;

/// Query parameters of the upgrade request
#[derive(Debug, Deserialize)]
pub struct GatewayParams {
    token: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<GatewayParams>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let token = params
        .token
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingCredential)?;

    let identity = match state.sessions.validate(&token).await {
        Ok(identity) => identity,
        Err(SessionError::Invalid) => {
            return Err(AppError::AuthenticationFailed(
                "session token invalid or expired".to_string(),
            ));
        }
        Err(SessionError::Store(e)) => return Err(AppError::StoreUnavailable(e.to_string())),
        Err(SessionError::Internal(e)) => return Err(AppError::Internal(e)),
    };

    tracing::debug!(identity = %identity, "connection gate passed");

    let ws = ws
        .max_message_size(state.settings.websocket.max_message_size)
        .max_frame_size(state.settings.websocket.max_frame_size);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity)))
}
