//! Authentication Service
//!
//! Orchestrates the one-shot authentication flow: verify the external
//! provider credential, fetch-or-provision the player profile, and issue a
//! session token. This is the only place the verifier and the profile
//! registry are called; both are awaited here, never inside a room or token
//! critical section.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::services::session_service::{IssuedSession, SessionAuthority, SessionError};
use crate::domain::services::{IdentityVerifier, VerificationError};
use crate::domain::{PlayerProfile, PlayerRepository};
use crate::infrastructure::store::StoreError;
use crate::shared::error::AppError;

/// Authentication flow errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider could not verify the credential. Network trouble,
    /// malformed responses, and outright rejection all land here; the cause
    /// is logged but clients see one uniform failure.
    #[error("Credential verification failed: {0}")]
    Verification(#[from] VerificationError),

    /// An infrastructure dependency is down; safe to retry.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Store(e) => AuthError::Store(e),
            SessionError::Invalid => AuthError::Internal("unexpected invalid session".into()),
            SessionError::Internal(msg) => AuthError::Internal(msg),
        }
    }
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedPlayer {
    /// The issued session token
    pub session: IssuedSession,

    /// The player's profile, provisioned on first sight
    pub profile: PlayerProfile,
}

/// Authentication flow over the verifier, profile registry, and session
/// authority.
pub struct AuthService {
    verifier: Arc<dyn IdentityVerifier>,
    players: Arc<dyn PlayerRepository>,
    sessions: Arc<SessionAuthority>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        players: Arc<dyn PlayerRepository>,
        sessions: Arc<SessionAuthority>,
    ) -> Self {
        Self {
            verifier,
            players,
            sessions,
        }
    }

    /// Authenticate a provider credential end to end.
    ///
    /// On success the caller receives a session token plus the profile; the
    /// profile is created with provisioning defaults the first time an
    /// identity is seen and returned untouched afterwards.
    #[instrument(skip(self, credential))]
    pub async fn authenticate(&self, credential: &str) -> Result<AuthenticatedPlayer, AuthError> {
        let verified = self.verifier.verify(credential).await.map_err(|e| {
            warn!(cause = %e, "Credential verification failed");
            e
        })?;

        let candidate = PlayerProfile::provision(
            verified.identity.clone(),
            verified.display_name,
            verified.avatar_url,
        );

        let profile = self
            .players
            .get_or_create(&candidate)
            .await
            .map_err(|e| match e {
                AppError::Database(db) => {
                    AuthError::Store(StoreError::Unavailable(db.to_string()))
                }
                other => AuthError::Internal(other.to_string()),
            })?;

        let session = self.sessions.issue(&verified.identity).await?;

        info!(
            identity = %profile.player_id,
            game_tag = %profile.game_tag,
            "Player authenticated"
        );

        Ok(AuthenticatedPlayer { session, profile })
    }
}
