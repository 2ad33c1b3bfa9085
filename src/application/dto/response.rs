//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::services::AuthenticatedPlayer;
use crate::domain::PlayerProfile;

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Opaque bearer token for the session
    pub session_token: String,

    /// Seconds until the token expires
    pub expires_in: u64,

    /// Verified provider identity
    pub identity: String,

    /// The player's profile
    pub profile: ProfileResponse,
}

impl From<AuthenticatedPlayer> for AuthResponse {
    fn from(authenticated: AuthenticatedPlayer) -> Self {
        Self {
            session_token: authenticated.session.token,
            expires_in: authenticated.session.expires_in,
            identity: authenticated.profile.player_id.to_string(),
            profile: ProfileResponse::from_profile(authenticated.profile),
        }
    }
}

/// Player profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub identity: String,
    pub game_tag: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub country: String,
    pub coins: i64,
    pub gems: i64,
    pub created_at: String,
}

impl ProfileResponse {
    pub fn from_profile(profile: PlayerProfile) -> Self {
        Self {
            identity: profile.player_id.to_string(),
            game_tag: profile.game_tag,
            display_name: profile.display_name,
            avatar_url: profile.avatar_url,
            country: profile.country,
            coins: profile.coins,
            gems: profile.gems,
            created_at: profile.created_at.to_rfc3339(),
        }
    }
}
