use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{
    ParticipantFilter, ParticipationFilter, ParticipationRecord, TournamentParticipant,
};
use crate::shared::AppError;

/// Read access to `tournament_participants`
#[async_trait]
pub trait ParticipationRepository: Send + Sync {
    /// Raw rows for aggregation, in no particular order, capped at `filter.limit`
    async fn list_participation(
        &self,
        filter: &ParticipationFilter,
    ) -> Result<Vec<ParticipationRecord>, AppError>;

    /// Highest individual scores first, capped at `filter.limit`
    async fn top_participants(
        &self,
        filter: &ParticipantFilter,
    ) -> Result<Vec<TournamentParticipant>, AppError>;
}

/// In-memory implementation for development and testing
///
/// Game scoping needs to know which game each tournament belongs to, so the
/// repository keeps its own tournament → game index. Tournaments missing from
/// the index never match a game filter.
#[derive(Debug, Default)]
pub struct InMemoryParticipationRepository {
    participants: Arc<RwLock<Vec<TournamentParticipant>>>,
    tournament_games: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryParticipationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository with pre-populated participation rows
    pub fn with_participants(participants: Vec<TournamentParticipant>) -> Self {
        Self {
            participants: Arc::new(RwLock::new(participants)),
            tournament_games: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers the games tournaments belong to, used by game-scoped reads
    pub fn with_tournament_games(self, pairs: Vec<(String, String)>) -> Self {
        Self {
            participants: self.participants,
            tournament_games: Arc::new(RwLock::new(pairs.into_iter().collect())),
        }
    }

    pub async fn insert(&self, participant: TournamentParticipant) {
        self.participants.write().await.push(participant);
    }

    pub async fn participant_count(&self) -> usize {
        self.participants.read().await.len()
    }
}

#[async_trait]
impl ParticipationRepository for InMemoryParticipationRepository {
    #[instrument(skip(self))]
    async fn list_participation(
        &self,
        filter: &ParticipationFilter,
    ) -> Result<Vec<ParticipationRecord>, AppError> {
        let participants = self.participants.read().await;
        let tournament_games = self.tournament_games.read().await;

        let records: Vec<ParticipationRecord> = participants
            .iter()
            .filter(|p| match &filter.game_id {
                Some(game_id) => tournament_games.get(&p.tournament_id) == Some(game_id),
                None => true,
            })
            .take(filter.limit.max(0) as usize)
            .map(TournamentParticipant::to_record)
            .collect();

        debug!(row_count = records.len(), "Listed participation from memory");
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn top_participants(
        &self,
        filter: &ParticipantFilter,
    ) -> Result<Vec<TournamentParticipant>, AppError> {
        let participants = self.participants.read().await;

        let mut rows: Vec<TournamentParticipant> = participants
            .iter()
            .filter(|p| match &filter.tournament_id {
                Some(tournament_id) => &p.tournament_id == tournament_id,
                None => true,
            })
            .cloned()
            .collect();

        // None sorts below Some, so null scores land last
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows.truncate(filter.limit.max(0) as usize);

        debug!(row_count = rows.len(), "Listed top participants from memory");
        Ok(rows)
    }
}

/// PostgreSQL implementation reading the hosted store directly
pub struct PostgresParticipationRepository {
    pool: PgPool,
}

impl PostgresParticipationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipationRepository for PostgresParticipationRepository {
    #[instrument(skip(self))]
    async fn list_participation(
        &self,
        filter: &ParticipationFilter,
    ) -> Result<Vec<ParticipationRecord>, AppError> {
        debug!("Fetching participation rows from database");

        let result = match &filter.game_id {
            Some(game_id) => {
                sqlx::query_as::<_, ParticipationRecord>(
                    "SELECT p.user_id::text AS user_id, p.tournament_id::text AS tournament_id, p.score::bigint AS score \
                     FROM tournament_participants p \
                     JOIN tournaments t ON t.id = p.tournament_id \
                     WHERE p.user_id IS NOT NULL AND t.game_id::text = $1 \
                     LIMIT $2",
                )
                .bind(game_id)
                .bind(filter.limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ParticipationRecord>(
                    "SELECT user_id::text AS user_id, tournament_id::text AS tournament_id, score::bigint AS score \
                     FROM tournament_participants \
                     WHERE user_id IS NOT NULL AND tournament_id IS NOT NULL \
                     LIMIT $1",
                )
                .bind(filter.limit)
                .fetch_all(&self.pool)
                .await
            }
        };

        let records = result.map_err(|e| {
            warn!(error = %e, "Failed to fetch participation rows");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(row_count = records.len(), "Participation rows fetched");
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn top_participants(
        &self,
        filter: &ParticipantFilter,
    ) -> Result<Vec<TournamentParticipant>, AppError> {
        debug!("Fetching top participants from database");

        let rows = sqlx::query_as::<_, TournamentParticipant>(
            "SELECT user_id::text AS user_id, tournament_id::text AS tournament_id, \
                    score::bigint AS score, rank::int AS rank \
             FROM tournament_participants \
             WHERE user_id IS NOT NULL AND tournament_id IS NOT NULL \
               AND ($1::text IS NULL OR tournament_id::text = $1) \
             ORDER BY score DESC NULLS LAST \
             LIMIT $2",
        )
        .bind(filter.tournament_id.as_deref())
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch top participants");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(row_count = rows.len(), "Top participants fetched");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryParticipationRepository {
        InMemoryParticipationRepository::with_participants(vec![
            TournamentParticipant::new("alice", "t1", Some(10)),
            TournamentParticipant::new("bob", "t1", None),
            TournamentParticipant::new("carol", "t2", Some(30)),
            TournamentParticipant::new("alice", "t3", Some(5)),
        ])
        .with_tournament_games(vec![
            ("t1".to_string(), "g1".to_string()),
            ("t2".to_string(), "g2".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_list_participation_unfiltered() {
        let repo = seeded();
        let records = repo
            .list_participation(&ParticipationFilter::default())
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[1].score, None);
    }

    #[tokio::test]
    async fn test_list_participation_scoped_to_game() {
        let repo = seeded();
        let filter = ParticipationFilter {
            game_id: Some("g1".to_string()),
            ..ParticipationFilter::default()
        };

        let records = repo.list_participation(&filter).await.unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.tournament_id == "t1"));
    }

    #[tokio::test]
    async fn test_list_participation_respects_limit() {
        let repo = seeded();
        let filter = ParticipationFilter {
            game_id: None,
            limit: 2,
        };

        let records = repo.list_participation(&filter).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_top_participants_orders_by_score_with_nulls_last() {
        let repo = seeded();
        let rows = repo
            .top_participants(&ParticipantFilter::default())
            .await
            .unwrap();

        let scores: Vec<Option<i64>> = rows.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![Some(30), Some(10), Some(5), None]);
    }

    #[tokio::test]
    async fn test_top_participants_scoped_to_tournament() {
        let repo = seeded();
        let filter = ParticipantFilter {
            tournament_id: Some("t1".to_string()),
            limit: 10,
        };

        let rows = repo.top_participants(&filter).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user_id, "alice");
    }

    #[tokio::test]
    async fn test_insert_adds_rows() {
        let repo = InMemoryParticipationRepository::new();
        repo.insert(TournamentParticipant::new("dave", "t9", Some(1)))
            .await;
        assert_eq!(repo.participant_count().await, 1);
    }
}
