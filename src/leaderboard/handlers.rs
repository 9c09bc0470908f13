use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{info, instrument};

use super::{
    models::{GlobalStandings, StandingsFilter, DEFAULT_STANDINGS_LIMIT},
    service::LeaderboardService,
    types::{
        clamp_limit, non_empty, GlobalQuery, TournamentQuery, TournamentStandingsResponse,
        WeeklyHighlightsResponse, WeeklyQuery,
    },
    LeaderboardError,
};
use crate::{
    highlights::{models::DEFAULT_HIGHLIGHT_LIMIT, HighlightFilter, HighlightKind},
    participation::{models::DEFAULT_PARTICIPANT_LIMIT, ParticipantFilter},
    shared::{AppError, AppState},
};

/// HTTP handler for the global (user, game) leaderboard
///
/// GET /leaderboards/global?game_id=&limit=
/// Returns ranked rows plus the source that produced them
#[instrument(name = "global_leaderboard", skip(state))]
pub async fn global_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<GlobalQuery>,
) -> Result<Json<GlobalStandings>, AppError> {
    let filter = StandingsFilter {
        game_id: non_empty(query.game_id),
        limit: clamp_limit(query.limit, DEFAULT_STANDINGS_LIMIT as i64) as usize,
    };

    let service = LeaderboardService::from_state(&state);
    let standings = service.global_standings(&filter).await?;

    info!(
        source = %standings.source,
        row_count = standings.rows.len(),
        "Global leaderboard served"
    );

    Ok(Json(standings))
}

/// HTTP handler for tournament standings
///
/// GET /leaderboards/tournament?tournament_id=&limit=
#[instrument(name = "tournament_leaderboard", skip(state))]
pub async fn tournament_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<TournamentQuery>,
) -> Result<Json<TournamentStandingsResponse>, AppError> {
    let filter = ParticipantFilter {
        tournament_id: non_empty(query.tournament_id),
        limit: clamp_limit(query.limit, DEFAULT_PARTICIPANT_LIMIT),
    };

    let service = LeaderboardService::from_state(&state);
    let rows = service.tournament_standings(&filter).await?;

    info!(row_count = rows.len(), "Tournament leaderboard served");

    Ok(Json(TournamentStandingsResponse { rows }))
}

/// HTTP handler for weekly highlights
///
/// GET /leaderboards/weekly?kind=&game_id=&limit=
#[instrument(name = "weekly_leaderboard", skip(state))]
pub async fn weekly_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<WeeklyQuery>,
) -> Result<Json<WeeklyHighlightsResponse>, AppError> {
    let kind = match non_empty(query.kind) {
        Some(raw) => Some(raw.parse::<HighlightKind>().map_err(|_| {
            LeaderboardError::Validation(format!("unknown highlight kind: {}", raw))
        })?),
        None => None,
    };

    let filter = HighlightFilter {
        kind,
        game_id: non_empty(query.game_id),
        limit: clamp_limit(query.limit, DEFAULT_HIGHLIGHT_LIMIT),
    };

    let service = LeaderboardService::from_state(&state);
    let rows = service.weekly_highlights(&filter).await?;

    info!(row_count = rows.len(), "Weekly leaderboard served");

    Ok(Json(WeeklyHighlightsResponse { rows }))
}
