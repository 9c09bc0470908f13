use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};

/// Maps a tournament to the game it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, FromRow, Serialize, Deserialize)]
pub struct TournamentMeta {
    pub tournament_id: String,
    pub game_id: String,
}

impl TournamentMeta {
    pub fn new(tournament_id: &str, game_id: &str) -> Self {
        Self {
            tournament_id: tournament_id.to_string(),
            game_id: game_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    Upcoming,
    Active,
    Finished,
}

impl TournamentStatus {
    /// Unknown or missing status strings map to `None` rather than failing the row.
    pub fn parse_lenient(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| value.trim().to_lowercase().parse().ok())
    }
}

/// Title and status used to label tournament standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: String,
    pub title: Option<String>,
    pub status: Option<TournamentStatus>,
}

/// Raw `tournaments` row before the status column is validated.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct TournamentSummaryRow {
    pub id: String,
    pub title: Option<String>,
    pub status: Option<String>,
}

impl From<TournamentSummaryRow> for TournamentSummary {
    fn from(row: TournamentSummaryRow) -> Self {
        Self {
            status: TournamentStatus::parse_lenient(row.status.as_deref()),
            id: row.id,
            title: row.title,
        }
    }
}
