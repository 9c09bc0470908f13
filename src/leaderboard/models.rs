use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::highlights::HighlightKind;
use crate::tournament::TournamentStatus;

/// Default page size for the global leaderboard.
pub const DEFAULT_STANDINGS_LIMIT: usize = 200;

/// Summed score of one user in one game, before ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTotal {
    pub user_id: String,
    pub game_id: String,
    pub total_score: i64,
}

/// One ranked (user, game) standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub user_id: String,
    pub game_id: String,
    pub total_score: i64,
    pub rank: Option<u32>, // None only for precomputed rows stored without a rank
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsFilter {
    pub game_id: Option<String>,
    pub limit: usize,
}

impl Default for StandingsFilter {
    fn default() -> Self {
        Self {
            game_id: None,
            limit: DEFAULT_STANDINGS_LIMIT,
        }
    }
}

/// Which path produced a global board.
///
/// The precomputed table may tie-break or score differently from the
/// computed fallback, so responses always say which one they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StandingsSource {
    Precomputed,
    Computed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStandingRow {
    pub user_id: String,
    pub game_id: String,
    pub player: Option<String>,
    pub game: Option<String>,
    pub total_score: i64,
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStandings {
    pub source: StandingsSource,
    pub rows: Vec<GlobalStandingRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentStandingRow {
    pub user_id: String,
    pub tournament_id: String,
    pub player: Option<String>,
    pub tournament: Option<String>,
    pub status: Option<TournamentStatus>,
    pub score: Option<i64>,
    pub rank: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRow {
    pub id: i64,
    pub kind: HighlightKind,
    pub week_start: NaiveDate,
    pub reason: Option<String>,
    pub user_id: Option<String>,
    pub game_id: Option<String>,
    pub player: Option<String>,
    pub game: Option<String>,
}
