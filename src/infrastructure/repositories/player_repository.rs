//! Player Repository Implementation
//!
//! PostgreSQL implementation of the PlayerRepository trait.
//! Maps between the database schema and the domain PlayerProfile entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Identity, PlayerProfile, PlayerRepository};
use crate::shared::error::AppError;

/// Database row representation matching the players table schema.
#[derive(Debug, sqlx::FromRow)]
struct PlayerRow {
    player_id: String,
    game_tag: String,
    display_name: String,
    avatar_url: Option<String>,
    country: String,
    coins: i64,
    gems: i64,
    created_at: DateTime<Utc>,
}

impl PlayerRow {
    /// Convert database row to domain PlayerProfile entity.
    fn into_profile(self) -> PlayerProfile {
        PlayerProfile {
            player_id: Identity::new(self.player_id),
            game_tag: self.game_tag,
            display_name: self.display_name,
            avatar_url: self.avatar_url,
            country: self.country,
            coins: self.coins,
            gems: self.gems,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL player repository implementation.
///
/// Provides profile lookup and first-sight provisioning against a
/// PostgreSQL database.
#[derive(Clone)]
pub struct PgPlayerRepository {
    pool: PgPool,
}

impl PgPlayerRepository {
    /// Create a new PgPlayerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for PgPlayerRepository {
    /// Find a profile by provider identity.
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<PlayerProfile>, AppError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT player_id, game_tag, display_name, avatar_url,
                   country, coins, gems, created_at
            FROM players
            WHERE player_id = $1
            "#,
        )
        .bind(identity.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_profile()))
    }

    /// Fetch the profile for an identity, inserting `candidate` on first
    /// sight. `ON CONFLICT DO NOTHING` plus a re-fetch makes concurrent
    /// provisioning of the same identity converge on a single row.
    async fn get_or_create(&self, candidate: &PlayerProfile) -> Result<PlayerProfile, AppError> {
        if let Some(existing) = self.find_by_identity(&candidate.player_id).await? {
            return Ok(existing);
        }

        let inserted = sqlx::query_as::<_, PlayerRow>(
            r#"
            INSERT INTO players (player_id, game_tag, display_name, avatar_url,
                                 country, coins, gems, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (player_id) DO NOTHING
            RETURNING player_id, game_tag, display_name, avatar_url,
                      country, coins, gems, created_at
            "#,
        )
        .bind(candidate.player_id.as_str())
        .bind(&candidate.game_tag)
        .bind(&candidate.display_name)
        .bind(&candidate.avatar_url)
        .bind(&candidate.country)
        .bind(candidate.coins)
        .bind(candidate.gems)
        .bind(candidate.created_at)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(row) => Ok(row.into_profile()),
            // Lost a provisioning race; the winner's row is authoritative
            None => self
                .find_by_identity(&candidate.player_id)
                .await?
                .ok_or_else(|| {
                    AppError::Internal("player row missing after conflicting insert".to_string())
                }),
        }
    }

    /// Cheap connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
