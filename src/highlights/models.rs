use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};

pub const DEFAULT_HIGHLIGHT_LIMIT: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    User,
    Youtuber,
    Gamenet,
}

/// A featured player, creator or game-net for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHighlight {
    pub id: i64,
    pub kind: HighlightKind,
    pub week_start: NaiveDate,
    pub reason: Option<String>,
    pub user_id: Option<String>,
    pub game_id: Option<String>,
}

/// Raw `weekly_highlights` row before `type` is validated.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct WeeklyHighlightRow {
    pub id: i64,
    pub kind: String,
    pub week_start: NaiveDate,
    pub reason: Option<String>,
    pub user_id: Option<String>,
    pub game_id: Option<String>,
}

impl TryFrom<WeeklyHighlightRow> for WeeklyHighlight {
    type Error = String;

    fn try_from(row: WeeklyHighlightRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<HighlightKind>()
            .map_err(|_| row.kind.clone())?;

        Ok(Self {
            id: row.id,
            kind,
            week_start: row.week_start,
            reason: row.reason,
            user_id: row.user_id,
            game_id: row.game_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightFilter {
    pub kind: Option<HighlightKind>,
    pub game_id: Option<String>,
    pub limit: i64,
}

impl Default for HighlightFilter {
    fn default() -> Self {
        Self {
            kind: None,
            game_id: None,
            limit: DEFAULT_HIGHLIGHT_LIMIT,
        }
    }
}

impl HighlightFilter {
    pub fn matches(&self, highlight: &WeeklyHighlight) -> bool {
        self.kind.map_or(true, |kind| highlight.kind == kind)
            && self
                .game_id
                .as_ref()
                .map_or(true, |game_id| highlight.game_id.as_ref() == Some(game_id))
    }
}
