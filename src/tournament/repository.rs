use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{TournamentMeta, TournamentStatus, TournamentSummary, TournamentSummaryRow};
use crate::shared::AppError;

/// Lookups against the `tournaments` table
///
/// Ids that don't exist are omitted from results rather than reported.
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// Tournament → game pairs for the given ids; tournaments without a game are skipped
    async fn game_map(&self, tournament_ids: &[String]) -> Result<Vec<TournamentMeta>, AppError>;

    /// Title and status for the given ids
    async fn summaries(
        &self,
        tournament_ids: &[String],
    ) -> Result<Vec<TournamentSummary>, AppError>;
}

#[derive(Debug, Clone)]
struct StoredTournament {
    game_id: Option<String>,
    title: Option<String>,
    status: Option<TournamentStatus>,
}

/// In-memory implementation for development and testing
#[derive(Debug, Default)]
pub struct InMemoryTournamentRepository {
    tournaments: Arc<RwLock<HashMap<String, StoredTournament>>>,
}

impl InMemoryTournamentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository where each tournament only carries its game
    pub fn with_game_map(meta: Vec<TournamentMeta>) -> Self {
        let tournaments = meta
            .into_iter()
            .map(|m| {
                (
                    m.tournament_id,
                    StoredTournament {
                        game_id: Some(m.game_id),
                        title: None,
                        status: None,
                    },
                )
            })
            .collect();

        Self {
            tournaments: Arc::new(RwLock::new(tournaments)),
        }
    }

    pub async fn insert(
        &self,
        id: &str,
        game_id: Option<&str>,
        title: Option<&str>,
        status: Option<TournamentStatus>,
    ) {
        self.tournaments.write().await.insert(
            id.to_string(),
            StoredTournament {
                game_id: game_id.map(str::to_string),
                title: title.map(str::to_string),
                status,
            },
        );
    }
}

#[async_trait]
impl TournamentRepository for InMemoryTournamentRepository {
    #[instrument(skip(self, tournament_ids), fields(requested = tournament_ids.len()))]
    async fn game_map(&self, tournament_ids: &[String]) -> Result<Vec<TournamentMeta>, AppError> {
        let tournaments = self.tournaments.read().await;

        let meta: Vec<TournamentMeta> = tournament_ids
            .iter()
            .filter_map(|id| {
                let game_id = tournaments.get(id)?.game_id.clone()?;
                Some(TournamentMeta {
                    tournament_id: id.clone(),
                    game_id,
                })
            })
            .collect();

        debug!(resolved = meta.len(), "Resolved tournament games from memory");
        Ok(meta)
    }

    #[instrument(skip(self, tournament_ids), fields(requested = tournament_ids.len()))]
    async fn summaries(
        &self,
        tournament_ids: &[String],
    ) -> Result<Vec<TournamentSummary>, AppError> {
        let tournaments = self.tournaments.read().await;

        let summaries: Vec<TournamentSummary> = tournament_ids
            .iter()
            .filter_map(|id| {
                tournaments.get(id).map(|t| TournamentSummary {
                    id: id.clone(),
                    title: t.title.clone(),
                    status: t.status,
                })
            })
            .collect();

        debug!(resolved = summaries.len(), "Resolved tournament summaries from memory");
        Ok(summaries)
    }
}

/// PostgreSQL implementation of tournament lookups
pub struct PostgresTournamentRepository {
    pool: PgPool,
}

impl PostgresTournamentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TournamentRepository for PostgresTournamentRepository {
    #[instrument(skip(self, tournament_ids), fields(requested = tournament_ids.len()))]
    async fn game_map(&self, tournament_ids: &[String]) -> Result<Vec<TournamentMeta>, AppError> {
        if tournament_ids.is_empty() {
            return Ok(Vec::new());
        }

        // game_id is an integer in some deployments, compare and return it as text
        let meta = sqlx::query_as::<_, TournamentMeta>(
            "SELECT id::text AS tournament_id, game_id::text AS game_id \
             FROM tournaments \
             WHERE id::text = ANY($1) AND game_id IS NOT NULL",
        )
        .bind(tournament_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch tournament game map");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(resolved = meta.len(), "Tournament game map fetched");
        Ok(meta)
    }

    #[instrument(skip(self, tournament_ids), fields(requested = tournament_ids.len()))]
    async fn summaries(
        &self,
        tournament_ids: &[String],
    ) -> Result<Vec<TournamentSummary>, AppError> {
        if tournament_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, TournamentSummaryRow>(
            "SELECT id::text AS id, title, status::text AS status \
             FROM tournaments \
             WHERE id::text = ANY($1)",
        )
        .bind(tournament_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch tournament summaries");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(resolved = rows.len(), "Tournament summaries fetched");
        Ok(rows.into_iter().map(TournamentSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_game_map_omits_unknown_ids() {
        let repo = InMemoryTournamentRepository::with_game_map(vec![
            TournamentMeta::new("t1", "g1"),
            TournamentMeta::new("t2", "g2"),
        ]);

        let meta = repo.game_map(&ids(&["t1", "missing", "t2"])).await.unwrap();

        assert_eq!(
            meta,
            vec![TournamentMeta::new("t1", "g1"), TournamentMeta::new("t2", "g2")]
        );
    }

    #[tokio::test]
    async fn test_game_map_skips_tournaments_without_game() {
        let repo = InMemoryTournamentRepository::new();
        repo.insert("t1", None, Some("Friendly"), Some(TournamentStatus::Active))
            .await;

        let meta = repo.game_map(&ids(&["t1"])).await.unwrap();
        assert!(meta.is_empty());
    }

    #[tokio::test]
    async fn test_summaries_resolve_title_and_status() {
        let repo = InMemoryTournamentRepository::new();
        repo.insert(
            "t1",
            Some("g1"),
            Some("CODM Cup"),
            Some(TournamentStatus::Finished),
        )
        .await;

        let summaries = repo.summaries(&ids(&["t1", "t404"])).await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].title.as_deref(), Some("CODM Cup"));
        assert_eq!(summaries[0].status, Some(TournamentStatus::Finished));
    }

    #[tokio::test]
    async fn test_empty_request_returns_empty() {
        let repo = InMemoryTournamentRepository::new();
        assert!(repo.game_map(&[]).await.unwrap().is_empty());
        assert!(repo.summaries(&[]).await.unwrap().is_empty());
    }
}
