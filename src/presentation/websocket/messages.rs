//! WebSocket Message Types
//!
//! Wire format for the real-time channel. Frames are JSON objects with an
//! `op` discriminator and an optional `d` payload:
//!
//! ```json
//! {"op": "join_room", "d": {"room_id": "table-42"}}
//! {"op": "dice_result", "d": {"identity": "100004312345678", "value": 4}}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::Identity;

/// Incoming client frame
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join a room, leaving the current one if any
    JoinRoom { room_id: String },
    /// Roll a die in the current room
    RollDice,
}

/// Outgoing server frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once after the credential check, confirming the bound identity
    Ready { identity: Identity },
    /// A player joined the room (delivered to every member, joiner included)
    PlayerJoined { identity: Identity },
    /// A die was rolled in the room
    DiceResult { identity: Identity, value: u8 },
    /// Scoped protocol error; the connection stays open
    Error { kind: String, message: String },
}

impl ServerMessage {
    /// Event name used for broadcast metrics labels
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::Ready { .. } => "ready",
            ServerMessage::PlayerJoined { .. } => "player_joined",
            ServerMessage::DiceResult { .. } => "dice_result",
            ServerMessage::Error { .. } => "error",
        }
    }
}
