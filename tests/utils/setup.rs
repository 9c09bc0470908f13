use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use tower::ServiceExt; // for `oneshot`

use arenafa::{
    build_router,
    directory::InMemoryDisplayNameResolver,
    highlights::{HighlightKind, InMemoryHighlightRepository, WeeklyHighlight},
    leaderboard::{InMemoryPrecomputedLeaderboardRepository, LeaderboardService},
    participation::{InMemoryParticipationRepository, TournamentParticipant},
    tournament::{InMemoryTournamentRepository, TournamentStatus},
    AggregateEntry, AppConfig, AppState,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct ArenaSetup {
    pub state: AppState,
    pub participation: Arc<InMemoryParticipationRepository>,
    pub tournaments: Arc<InMemoryTournamentRepository>,
    pub directory: Arc<InMemoryDisplayNameResolver>,
    pub precomputed: Arc<InMemoryPrecomputedLeaderboardRepository>,
    pub highlights: Arc<InMemoryHighlightRepository>,
}

impl ArenaSetup {
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    pub fn service(&self) -> LeaderboardService {
        LeaderboardService::from_state(&self.state)
    }
}

struct TournamentSeed {
    id: String,
    game_id: Option<String>,
    title: Option<String>,
    status: Option<TournamentStatus>,
}

#[derive(Default)]
pub struct ArenaSetupBuilder {
    participants: Vec<TournamentParticipant>,
    tournaments: Vec<TournamentSeed>,
    usernames: Vec<(String, String)>,
    game_titles: Vec<(String, String)>,
    precomputed: Vec<AggregateEntry>,
    highlights: Vec<WeeklyHighlight>,
    config: AppConfig,
}

impl ArenaSetupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, user_id: &str, tournament_id: &str, score: Option<i64>) -> Self {
        self.participants
            .push(TournamentParticipant::new(user_id, tournament_id, score));
        self
    }

    pub fn with_tournament(mut self, tournament_id: &str, game_id: &str) -> Self {
        self.tournaments.push(TournamentSeed {
            id: tournament_id.to_string(),
            game_id: Some(game_id.to_string()),
            title: None,
            status: None,
        });
        self
    }

    pub fn with_titled_tournament(
        mut self,
        tournament_id: &str,
        game_id: &str,
        title: &str,
        status: TournamentStatus,
    ) -> Self {
        self.tournaments.push(TournamentSeed {
            id: tournament_id.to_string(),
            game_id: Some(game_id.to_string()),
            title: Some(title.to_string()),
            status: Some(status),
        });
        self
    }

    pub fn with_username(mut self, user_id: &str, username: &str) -> Self {
        self.usernames
            .push((user_id.to_string(), username.to_string()));
        self
    }

    pub fn with_game_title(mut self, game_id: &str, title: &str) -> Self {
        self.game_titles
            .push((game_id.to_string(), title.to_string()));
        self
    }

    pub fn with_precomputed(
        mut self,
        user_id: &str,
        game_id: &str,
        total_score: i64,
        rank: Option<u32>,
    ) -> Self {
        self.precomputed.push(AggregateEntry {
            user_id: user_id.to_string(),
            game_id: game_id.to_string(),
            total_score,
            rank,
        });
        self
    }

    pub fn with_highlight(
        mut self,
        id: i64,
        kind: HighlightKind,
        week_start: (i32, u32, u32),
        user_id: Option<&str>,
        game_id: Option<&str>,
    ) -> Self {
        self.highlights.push(WeeklyHighlight {
            id,
            kind,
            week_start: NaiveDate::from_ymd_opt(week_start.0, week_start.1, week_start.2)
                .expect("valid week start"),
            reason: None,
            user_id: user_id.map(str::to_string),
            game_id: game_id.map(str::to_string),
        });
        self
    }

    pub fn with_participation_row_limit(mut self, limit: i64) -> Self {
        self.config.participation_row_limit = limit;
        self
    }

    pub async fn build(self) -> ArenaSetup {
        let tournament_games: Vec<(String, String)> = self
            .tournaments
            .iter()
            .filter_map(|t| t.game_id.clone().map(|g| (t.id.clone(), g)))
            .collect();

        let participation = Arc::new(
            InMemoryParticipationRepository::with_participants(self.participants)
                .with_tournament_games(tournament_games),
        );

        let tournaments = Arc::new(InMemoryTournamentRepository::new());
        for t in &self.tournaments {
            tournaments
                .insert(&t.id, t.game_id.as_deref(), t.title.as_deref(), t.status)
                .await;
        }

        let directory = Arc::new(InMemoryDisplayNameResolver::new());
        for (user_id, username) in &self.usernames {
            directory.set_username(user_id, username).await;
        }
        for (game_id, title) in &self.game_titles {
            directory.set_game_title(game_id, title).await;
        }

        let precomputed = Arc::new(InMemoryPrecomputedLeaderboardRepository::with_entries(
            self.precomputed,
        ));
        let highlights = Arc::new(InMemoryHighlightRepository::with_highlights(
            self.highlights,
        ));

        let state = AppState::new(
            participation.clone(),
            tournaments.clone(),
            directory.clone(),
            precomputed.clone(),
            highlights.clone(),
            self.config,
        );

        ArenaSetup {
            state,
            participation,
            tournaments,
            directory,
            precomputed,
            highlights,
        }
    }
}

// ============================================================================
// HTTP helpers
// ============================================================================

/// Sends a GET through the router and returns status plus parsed JSON body
pub async fn get(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");

    let response = router.oneshot(request).await.expect("router responds");
    let status = response.status();
    (status, body_json(response.into_body()).await)
}

pub async fn body_json(body: Body) -> serde_json::Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("readable body");
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
    })
}
