use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::config::DEFAULT_PARTICIPATION_ROW_LIMIT;

/// Default page size for the tournament standings view.
pub const DEFAULT_PARTICIPANT_LIMIT: i64 = 100;

/// One user's recorded score for one tournament.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ParticipationRecord {
    pub user_id: String,
    pub tournament_id: String,
    pub score: Option<i64>, // Nullable in the store, counted as 0 when summed
}

/// Full `tournament_participants` row as shown on the tournament tab.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct TournamentParticipant {
    pub user_id: String,
    pub tournament_id: String,
    pub score: Option<i64>,
    pub rank: Option<i32>, // Rank assigned by tournament admins, if any
}

impl TournamentParticipant {
    pub fn new(user_id: &str, tournament_id: &str, score: Option<i64>) -> Self {
        Self {
            user_id: user_id.to_string(),
            tournament_id: tournament_id.to_string(),
            score,
            rank: None,
        }
    }

    pub fn to_record(&self) -> ParticipationRecord {
        ParticipationRecord {
            user_id: self.user_id.clone(),
            tournament_id: self.tournament_id.clone(),
            score: self.score,
        }
    }
}

/// Scope for reading raw participation rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationFilter {
    pub game_id: Option<String>,
    pub limit: i64,
}

impl Default for ParticipationFilter {
    fn default() -> Self {
        Self {
            game_id: None,
            limit: DEFAULT_PARTICIPATION_ROW_LIMIT,
        }
    }
}

/// Scope for the tournament standings view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantFilter {
    pub tournament_id: Option<String>,
    pub limit: i64,
}

impl Default for ParticipantFilter {
    fn default() -> Self {
        Self {
            tournament_id: None,
            limit: DEFAULT_PARTICIPANT_LIMIT,
        }
    }
}
