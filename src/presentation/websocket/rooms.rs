//! Room Registry
//!
//! Tracks which connections are in which rooms and fans events out to room
//! members. Rooms are created implicitly on first join and dropped when the
//! last member leaves; any caller-supplied string names a valid room.
//!
//! Membership mutation and fan-out for a room happen under that room's map
//! entry lock, so join, leave, and broadcast on the same room are serialized
//! and each member observes broadcasts in the order they were processed.
//! Room switches take the two room locks sequentially, never nested.

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::messages::ServerMessage;
use crate::domain::Identity;
use crate::infrastructure::metrics;

/// A connection's presence in a room
#[derive(Debug)]
struct RoomMember {
    connection_id: Uuid,
    sender: mpsc::UnboundedSender<ServerMessage>,
}

/// Room state, ordered by join time
#[derive(Debug, Default)]
struct Room {
    members: Vec<RoomMember>,
}

/// Outcome of a join request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The connection was added and the room was notified
    Joined,
    /// The connection was already a member; nothing changed
    AlreadyMember,
}

/// Registry of all active rooms and connection memberships
pub struct RoomRegistry {
    /// Active rooms by room id
    rooms: DashMap<String, Room>,
    /// Connection id to current room id (at most one room per connection)
    memberships: DashMap<Uuid, String>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            memberships: DashMap::new(),
        }
    }

    /// Add a connection to a room, leaving its current room first if it is
    /// in a different one.
    ///
    /// Rejoining the current room is a no-op. After the membership is
    /// committed, every member of the room receives `player_joined`, the
    /// joiner included.
    pub fn join(
        &self,
        connection_id: Uuid,
        identity: &Identity,
        sender: mpsc::UnboundedSender<ServerMessage>,
        room_id: &str,
    ) -> JoinOutcome {
        let previous = self
            .memberships
            .get(&connection_id)
            .map(|entry| entry.value().clone());

        match previous {
            Some(current) if current == room_id => return JoinOutcome::AlreadyMember,
            Some(previous_room) => {
                // Room switch: drop out of the old room silently.
                self.remove_member(&previous_room, connection_id);
            }
            None => {}
        }

        self.memberships.insert(connection_id, room_id.to_string());

        {
            let mut room = self.rooms.entry(room_id.to_string()).or_default();
            room.members.push(RoomMember {
                connection_id,
                sender,
            });

            // Notify under the entry lock so the notification is ordered
            // before any broadcast that follows the join.
            let notification = ServerMessage::PlayerJoined {
                identity: identity.clone(),
            };
            for member in &room.members {
                let _ = member.sender.send(notification.clone());
            }
        }

        metrics::record_broadcast("player_joined");
        metrics::set_rooms_active(self.rooms.len());

        tracing::info!(
            connection_id = %connection_id,
            identity = %identity,
            room_id = %room_id,
            "player joined room"
        );

        JoinOutcome::Joined
    }

    /// Remove a connection from its current room, if any.
    ///
    /// Returns the room id that was left. The room is dropped when its last
    /// member leaves.
    pub fn leave(&self, connection_id: Uuid) -> Option<String> {
        let (_, room_id) = self.memberships.remove(&connection_id)?;
        self.remove_member(&room_id, connection_id);

        tracing::debug!(
            connection_id = %connection_id,
            room_id = %room_id,
            "connection left room"
        );

        Some(room_id)
    }

    /// Release all room state held for a closed connection.
    pub fn disconnect(&self, connection_id: Uuid) {
        let _ = self.leave(connection_id);
    }

    /// Deliver an event to every current member of a room.
    ///
    /// The membership set is locked for the duration of the fan-out, so
    /// members that join after the call starts do not receive the event and
    /// members that left are guaranteed not to. Returns the number of
    /// members the event was delivered to.
    pub fn broadcast(&self, room_id: &str, message: ServerMessage) -> usize {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return 0;
        };

        let mut delivered = 0;
        for member in &room.members {
            if member.sender.send(message.clone()).is_ok() {
                delivered += 1;
            }
        }
        drop(room);

        metrics::record_broadcast(message.event_name());
        delivered
    }

    /// The room a connection is currently in, if any.
    pub fn current_room(&self, connection_id: Uuid) -> Option<String> {
        self.memberships
            .get(&connection_id)
            .map(|entry| entry.value().clone())
    }

    /// Number of rooms with at least one member.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of members currently in a room.
    pub fn member_count(&self, room_id: &str) -> usize {
        self.rooms
            .get(room_id)
            .map(|room| room.members.len())
            .unwrap_or(0)
    }

    fn remove_member(&self, room_id: &str, connection_id: Uuid) {
        let mut emptied = false;
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            room.members.retain(|m| m.connection_id != connection_id);
            emptied = room.members.is_empty();
        }

        if emptied {
            // Emptiness is re-checked under the entry lock; a join may have
            // landed after the guard above was released.
            self.rooms.remove_if(room_id, |_, room| room.members.is_empty());
        }

        metrics::set_rooms_active(self.rooms.len());
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
