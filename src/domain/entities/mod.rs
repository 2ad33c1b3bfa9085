//! # Domain Entities
//!
//! Core domain entities representing the main business objects in the server.
//!
//! ## Core Entities
//!
//! - **PlayerProfile**: Persistent player profile, provisioned on first
//!   successful authentication
//! - **SessionRecord**: Identity binding stored against a session token in
//!   the TTL store
//!
//! ## Repository Traits
//!
//! Persistent entities carry an associated repository trait defining data
//! access operations. These traits are implemented in the infrastructure
//! layer, following the dependency inversion principle.

mod player;
mod session;

// Re-export PlayerProfile entity and related types
pub use player::{
    PlayerProfile, PlayerRepository, DEFAULT_COUNTRY, DEFAULT_DISPLAY_NAME, STARTING_COINS,
    STARTING_GEMS,
};

// Re-export SessionRecord entity
pub use session::SessionRecord;

#[cfg(test)]
pub use player::MockPlayerRepository;
