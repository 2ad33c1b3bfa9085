//! WebSocket Connection Handler
//!
//! Drives a single authenticated connection: forwards queued server frames
//! to the socket, decodes client frames, and releases room state on every
//! exit path, abrupt transport failure included.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::dispatcher;
use super::messages::{ClientMessage, ServerMessage};
use crate::domain::Identity;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Handle an authenticated WebSocket connection until it closes.
///
/// The identity was bound by the connection gate and never changes for the
/// lifetime of the connection.
pub async fn handle_socket(socket: WebSocket, state: AppState, identity: Identity) {
    let connection_id = Uuid::new_v4();
    metrics::connection_opened();

    tracing::debug!(
        connection_id = %connection_id,
        identity = %identity,
        "WebSocket connection established"
    );

    // Split socket for concurrent read/write
    let (mut sender, mut receiver) = socket.split();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Confirm the bound identity before any room traffic.
    let ready = ServerMessage::Ready {
        identity: identity.clone(),
    };
    if let Err(e) = sender
        .send(Message::Text(serde_json::to_string(&ready).unwrap().into()))
        .await
    {
        tracing::debug!(connection_id = %connection_id, error = %e, "Failed to send ready frame");
        metrics::connection_closed();
        return;
    }

    // Spawn task to forward messages from channel to WebSocket, preserving
    // channel order.
    let sender_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("Failed to serialize frame: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Main message loop
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_frame(&text, connection_id, &identity, &tx, &state);
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(connection_id = %connection_id, "Connection closed by client");
                break;
            }
            Ok(Message::Ping(_)) => {
                // Pong is handled automatically by axum
            }
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Cleanup
    state.rooms.disconnect(connection_id);
    metrics::connection_closed();
    sender_task.abort();

    tracing::info!(
        connection_id = %connection_id,
        identity = %identity,
        "Player disconnected"
    );
}

/// Handle one decoded client frame.
///
/// Protocol violations produce an error frame for this connection only; the
/// connection stays open and other room members are unaffected.
fn handle_frame(
    text: &str,
    connection_id: Uuid,
    identity: &Identity,
    tx: &mpsc::UnboundedSender<ServerMessage>,
    state: &AppState,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                connection_id = %connection_id,
                error = %e,
                "Unparseable frame"
            );
            // Decode detail stays in the log; the wire carries a stable kind.
            let err = AppError::Validation("unrecognized frame".into());
            let _ = tx.send(ServerMessage::Error {
                kind: err.kind().to_string(),
                message: err.to_string(),
            });
            return;
        }
    };

    match message {
        ClientMessage::JoinRoom { room_id } => {
            state
                .rooms
                .join(connection_id, identity, tx.clone(), &room_id);
        }
        ClientMessage::RollDice => {
            if let Err(e) = dispatcher::roll_dice(&state.rooms, connection_id, identity) {
                let _ = tx.send(ServerMessage::Error {
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }
}
