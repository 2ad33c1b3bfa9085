//! Game Event Dispatcher
//!
//! Produces game events attributed to the invoking identity and hands them
//! to the room registry for fan-out.

use rand::Rng;
use uuid::Uuid;

use super::messages::ServerMessage;
use super::rooms::RoomRegistry;
use crate::domain::Identity;
use crate::infrastructure::metrics;
use crate::shared::AppError;

/// Roll a die in the connection's current room.
///
/// The result is uniformly distributed in [1, 6] and broadcast to every
/// member of the room as `dice_result`. Fails with `NotInRoom` when the
/// connection has not joined a room; the failure has no side effects.
pub fn roll_dice(
    rooms: &RoomRegistry,
    connection_id: Uuid,
    identity: &Identity,
) -> Result<u8, AppError> {
    let room_id = rooms
        .current_room(connection_id)
        .ok_or(AppError::NotInRoom)?;

    let value: u8 = rand::rng().random_range(1..=6);
    metrics::record_dice_roll(value);

    let delivered = rooms.broadcast(
        &room_id,
        ServerMessage::DiceResult {
            identity: identity.clone(),
            value,
        },
    );

    tracing::debug!(
        identity = %identity,
        room_id = %room_id,
        value,
        delivered,
        "dice rolled"
    );

    Ok(value)
}
