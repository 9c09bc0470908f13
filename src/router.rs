use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::leaderboard::{global_leaderboard, tournament_leaderboard, weekly_leaderboard};
use crate::shared::AppState;

/// All HTTP routes served by the standings service
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/leaderboards/global", get(global_leaderboard))
        .route("/leaderboards/tournament", get(tournament_leaderboard))
        .route("/leaderboards/weekly", get(weekly_leaderboard))
        // Pages call these endpoints straight from the browser
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
