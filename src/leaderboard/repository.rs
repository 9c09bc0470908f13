use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{AggregateEntry, StandingsFilter};
use crate::shared::AppError;

/// Read access to the optional precomputed `leaderboard` table
///
/// An empty result means "not available"; the service then computes the
/// board from participation rows instead.
#[async_trait]
pub trait PrecomputedLeaderboardRepository: Send + Sync {
    /// Highest totals first, capped at `filter.limit`
    async fn top_entries(&self, filter: &StandingsFilter) -> Result<Vec<AggregateEntry>, AppError>;
}

/// In-memory implementation; starts empty, which makes the service fall back
#[derive(Debug, Default)]
pub struct InMemoryPrecomputedLeaderboardRepository {
    entries: Arc<RwLock<Vec<AggregateEntry>>>,
}

impl InMemoryPrecomputedLeaderboardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<AggregateEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Replaces the stored table, as a refresh of the precomputed view would
    pub async fn replace(&self, entries: Vec<AggregateEntry>) {
        *self.entries.write().await = entries;
    }
}

#[async_trait]
impl PrecomputedLeaderboardRepository for InMemoryPrecomputedLeaderboardRepository {
    #[instrument(skip(self))]
    async fn top_entries(&self, filter: &StandingsFilter) -> Result<Vec<AggregateEntry>, AppError> {
        let entries = self.entries.read().await;

        let mut rows: Vec<AggregateEntry> = entries
            .iter()
            .filter(|e| match &filter.game_id {
                Some(game_id) => &e.game_id == game_id,
                None => true,
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        rows.truncate(filter.limit);

        debug!(row_count = rows.len(), "Listed precomputed leaderboard from memory");
        Ok(rows)
    }
}

#[derive(Debug, FromRow)]
struct LeaderboardRow {
    user_id: String,
    game_id: String,
    total_score: Option<i64>,
    rank_global: Option<i64>,
}

impl From<LeaderboardRow> for AggregateEntry {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            user_id: row.user_id,
            game_id: row.game_id,
            total_score: row.total_score.unwrap_or(0),
            rank: row.rank_global.and_then(|rank| u32::try_from(rank).ok()),
        }
    }
}

/// PostgreSQL implementation reading the `leaderboard` table
pub struct PostgresPrecomputedLeaderboardRepository {
    pool: PgPool,
}

impl PostgresPrecomputedLeaderboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrecomputedLeaderboardRepository for PostgresPrecomputedLeaderboardRepository {
    #[instrument(skip(self))]
    async fn top_entries(&self, filter: &StandingsFilter) -> Result<Vec<AggregateEntry>, AppError> {
        debug!("Fetching precomputed leaderboard from database");

        let rows = sqlx::query_as::<_, LeaderboardRow>(
            "SELECT user_id::text AS user_id, game_id::text AS game_id, \
                    total_score::bigint AS total_score, rank_global::bigint AS rank_global \
             FROM leaderboard \
             WHERE user_id IS NOT NULL AND game_id IS NOT NULL \
               AND ($1::text IS NULL OR game_id::text = $1) \
             ORDER BY total_score DESC NULLS LAST \
             LIMIT $2",
        )
        .bind(filter.game_id.as_deref())
        .bind(filter.limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            // A deployment without the table lands here too
            warn!(error = %e, "Failed to fetch precomputed leaderboard");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(row_count = rows.len(), "Precomputed leaderboard fetched");
        Ok(rows.into_iter().map(AggregateEntry::from).collect())
    }
}
