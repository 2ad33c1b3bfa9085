//! Player profile entity and repository trait.
//!
//! Maps to the `players` table in the database schema. Profiles are
//! provisioned once, on first successful authentication; the server never
//! updates balances or display fields afterwards.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Identity;
use crate::shared::error::AppError;

/// Coins granted at first provisioning.
pub const STARTING_COINS: i64 = 2500;

/// Gems granted at first provisioning.
pub const STARTING_GEMS: i64 = 250;

/// Display name used when the identity provider supplies none.
pub const DEFAULT_DISPLAY_NAME: &str = "Unknown Player";

/// Country placeholder; no geo lookup is performed.
pub const DEFAULT_COUNTRY: &str = "Unknown";

/// Represents a player profile.
///
/// Maps to the `players` table:
/// - player_id: TEXT PRIMARY KEY (provider identity)
/// - game_tag: VARCHAR(8) NOT NULL
/// - display_name: VARCHAR(128) NOT NULL
/// - avatar_url: TEXT NULL
/// - country: VARCHAR(64) NOT NULL DEFAULT 'Unknown'
/// - coins: BIGINT NOT NULL
/// - gems: BIGINT NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Provider identity (primary key)
    pub player_id: Identity,

    /// Short public tag shown next to the display name
    pub game_tag: String,

    /// Display name from the provider, or the default
    pub display_name: String,

    /// URL to the player's avatar image
    pub avatar_url: Option<String>,

    /// Self-reported country; always the default in this system
    pub country: String,

    /// Soft-currency balance, written once at provisioning
    pub coins: i64,

    /// Hard-currency balance, written once at provisioning
    pub gems: i64,

    /// Profile creation timestamp
    pub created_at: DateTime<Utc>,
}

impl PlayerProfile {
    /// Build a fresh profile for an identity seen for the first time.
    ///
    /// Provider display fields are optional; missing values fall back to the
    /// provisioning defaults. The game tag is random and collisions between
    /// players are tolerated.
    pub fn provision(
        identity: Identity,
        display_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            player_id: identity,
            game_tag: generate_game_tag(),
            display_name: display_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            avatar_url,
            country: DEFAULT_COUNTRY.to_string(),
            coins: STARTING_COINS,
            gems: STARTING_GEMS,
            created_at: Utc::now(),
        }
    }
}

/// Generate an 8-character uppercase hex tag from 4 random bytes.
fn generate_game_tag() -> String {
    let bytes: [u8; 4] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

/// Repository trait for player profile data access.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Find a profile by provider identity.
    async fn find_by_identity(&self, identity: &Identity) -> Result<Option<PlayerProfile>, AppError>;

    /// Fetch the profile for an identity, inserting `candidate` if none
    /// exists yet. Concurrent first-sight calls for the same identity must
    /// converge on a single stored row; which caller's candidate wins is
    /// unspecified.
    async fn get_or_create(&self, candidate: &PlayerProfile) -> Result<PlayerProfile, AppError>;

    /// Cheap connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}
