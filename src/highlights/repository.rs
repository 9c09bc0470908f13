use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{HighlightFilter, WeeklyHighlight, WeeklyHighlightRow};
use crate::shared::AppError;

/// Read access to `weekly_highlights`
#[async_trait]
pub trait HighlightRepository: Send + Sync {
    /// Newest weeks first, capped at `filter.limit`
    async fn recent_highlights(
        &self,
        filter: &HighlightFilter,
    ) -> Result<Vec<WeeklyHighlight>, AppError>;
}

/// In-memory implementation for development and testing
#[derive(Debug, Default)]
pub struct InMemoryHighlightRepository {
    highlights: Arc<RwLock<Vec<WeeklyHighlight>>>,
}

impl InMemoryHighlightRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_highlights(highlights: Vec<WeeklyHighlight>) -> Self {
        Self {
            highlights: Arc::new(RwLock::new(highlights)),
        }
    }

    pub async fn insert(&self, highlight: WeeklyHighlight) {
        self.highlights.write().await.push(highlight);
    }
}

#[async_trait]
impl HighlightRepository for InMemoryHighlightRepository {
    #[instrument(skip(self))]
    async fn recent_highlights(
        &self,
        filter: &HighlightFilter,
    ) -> Result<Vec<WeeklyHighlight>, AppError> {
        let highlights = self.highlights.read().await;

        let mut rows: Vec<WeeklyHighlight> = highlights
            .iter()
            .filter(|h| filter.matches(h))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.week_start.cmp(&a.week_start));
        rows.truncate(filter.limit.max(0) as usize);

        debug!(row_count = rows.len(), "Listed highlights from memory");
        Ok(rows)
    }
}

/// PostgreSQL implementation of highlight reads
pub struct PostgresHighlightRepository {
    pool: PgPool,
}

impl PostgresHighlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HighlightRepository for PostgresHighlightRepository {
    #[instrument(skip(self))]
    async fn recent_highlights(
        &self,
        filter: &HighlightFilter,
    ) -> Result<Vec<WeeklyHighlight>, AppError> {
        debug!("Fetching weekly highlights from database");

        let kind = filter.kind.map(|k| k.to_string());
        let rows = sqlx::query_as::<_, WeeklyHighlightRow>(
            "SELECT id::bigint AS id, type::text AS kind, week_start, reason, \
                    user_id::text AS user_id, game_id::text AS game_id \
             FROM weekly_highlights \
             WHERE ($1::text IS NULL OR type::text = $1) \
               AND ($2::text IS NULL OR game_id::text = $2) \
             ORDER BY week_start DESC \
             LIMIT $3",
        )
        .bind(kind)
        .bind(filter.game_id.as_deref())
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch weekly highlights");
            AppError::DatabaseError(e.to_string())
        })?;

        let highlights: Vec<WeeklyHighlight> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                WeeklyHighlight::try_from(row)
                    .map_err(|kind| warn!(highlight_id = id, %kind, "Skipping highlight with unknown type"))
                    .ok()
            })
            .collect();

        debug!(row_count = highlights.len(), "Weekly highlights fetched");
        Ok(highlights)
    }
}
