use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::shared::AppError;

/// Human-readable labels keyed by id
///
/// Ids with no matching profile or game are simply absent; callers decide
/// what placeholder to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayNames {
    pub users: HashMap<String, String>,
    pub games: HashMap<String, String>,
}

impl DisplayNames {
    pub fn username(&self, user_id: &str) -> Option<String> {
        self.users.get(user_id).cloned()
    }

    pub fn game_title(&self, game_id: &str) -> Option<String> {
        self.games.get(game_id).cloned()
    }
}

/// Batch name resolution for profiles and games
#[async_trait]
pub trait DisplayNameResolver: Send + Sync {
    async fn resolve_display_names(
        &self,
        user_ids: &[String],
        game_ids: &[String],
    ) -> Result<DisplayNames, AppError>;
}

/// In-memory implementation for development and testing
#[derive(Debug, Default)]
pub struct InMemoryDisplayNameResolver {
    usernames: Arc<RwLock<HashMap<String, String>>>,
    game_titles: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryDisplayNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_username(&self, user_id: &str, username: &str) {
        self.usernames
            .write()
            .await
            .insert(user_id.to_string(), username.to_string());
    }

    pub async fn set_game_title(&self, game_id: &str, title: &str) {
        self.game_titles
            .write()
            .await
            .insert(game_id.to_string(), title.to_string());
    }
}

fn pick(source: &HashMap<String, String>, ids: &[String]) -> HashMap<String, String> {
    ids.iter()
        .filter_map(|id| source.get(id).map(|label| (id.clone(), label.clone())))
        .collect()
}

#[async_trait]
impl DisplayNameResolver for InMemoryDisplayNameResolver {
    #[instrument(skip_all, fields(users = user_ids.len(), games = game_ids.len()))]
    async fn resolve_display_names(
        &self,
        user_ids: &[String],
        game_ids: &[String],
    ) -> Result<DisplayNames, AppError> {
        let names = DisplayNames {
            users: pick(&*self.usernames.read().await, user_ids),
            games: pick(&*self.game_titles.read().await, game_ids),
        };

        debug!(
            users_resolved = names.users.len(),
            games_resolved = names.games.len(),
            "Resolved display names from memory"
        );
        Ok(names)
    }
}

/// PostgreSQL implementation reading `profiles` and `games`
pub struct PostgresDisplayNameResolver {
    pool: PgPool,
}

impl PostgresDisplayNameResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn label_map(
        &self,
        query: &'static str,
        ids: &[String],
    ) -> Result<HashMap<String, String>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to resolve display names");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get::<String, _>("id"), row.get::<String, _>("label")))
            .collect())
    }
}

#[async_trait]
impl DisplayNameResolver for PostgresDisplayNameResolver {
    #[instrument(skip_all, fields(users = user_ids.len(), games = game_ids.len()))]
    async fn resolve_display_names(
        &self,
        user_ids: &[String],
        game_ids: &[String],
    ) -> Result<DisplayNames, AppError> {
        let (users, games) = futures::try_join!(
            self.label_map(
                "SELECT id::text AS id, username AS label FROM profiles \
                 WHERE id::text = ANY($1) AND username IS NOT NULL",
                user_ids,
            ),
            self.label_map(
                "SELECT id::text AS id, title AS label FROM games \
                 WHERE id::text = ANY($1) AND title IS NOT NULL",
                game_ids,
            ),
        )?;

        debug!(
            users_resolved = users.len(),
            games_resolved = games.len(),
            "Display names fetched"
        );
        Ok(DisplayNames { users, games })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_known_ids_and_omits_unknown() {
        let resolver = InMemoryDisplayNameResolver::new();
        resolver.set_username("u1", "shahin").await;
        resolver.set_game_title("g1", "Call of Duty Mobile").await;

        let names = resolver
            .resolve_display_names(
                &["u1".to_string(), "u2".to_string()],
                &["g1".to_string(), "g9".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(names.username("u1").as_deref(), Some("shahin"));
        assert_eq!(names.username("u2"), None);
        assert_eq!(names.game_title("g1").as_deref(), Some("Call of Duty Mobile"));
        assert_eq!(names.games.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batches() {
        let resolver = InMemoryDisplayNameResolver::new();
        let names = resolver.resolve_display_names(&[], &[]).await.unwrap();
        assert_eq!(names, DisplayNames::default());
    }
}
