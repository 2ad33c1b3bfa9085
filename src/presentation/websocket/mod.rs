//! WebSocket Gateway
//!
//! Real-time channel: connection gate, per-connection handling, room
//! membership, and game event dispatch.

pub mod dispatcher;
pub mod gate;
pub mod handler;
pub mod messages;
pub mod rooms;

pub use gate::ws_handler;
pub use messages::{ClientMessage, ServerMessage};
pub use rooms::{JoinOutcome, RoomRegistry};
