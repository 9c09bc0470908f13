use serde::{Deserialize, Serialize};

use super::models::{HighlightRow, TournamentStandingRow};

/// Largest page any leaderboard endpoint will return
pub const MAX_PAGE_SIZE: i64 = 500;

/// Query string for GET /leaderboards/global
#[derive(Debug, Default, Deserialize)]
pub struct GlobalQuery {
    pub game_id: Option<String>,
    pub limit: Option<i64>,
}

/// Query string for GET /leaderboards/tournament
#[derive(Debug, Default, Deserialize)]
pub struct TournamentQuery {
    pub tournament_id: Option<String>,
    pub limit: Option<i64>,
}

/// Query string for GET /leaderboards/weekly
#[derive(Debug, Default, Deserialize)]
pub struct WeeklyQuery {
    pub kind: Option<String>,
    pub game_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TournamentStandingsResponse {
    pub rows: Vec<TournamentStandingRow>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyHighlightsResponse {
    pub rows: Vec<HighlightRow>,
}

/// Applies the default page size and keeps the result within 1..=MAX_PAGE_SIZE
pub fn clamp_limit(requested: Option<i64>, default: i64) -> i64 {
    requested.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

/// Treats `?game_id=` the same as no filter
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 100, 100)]
    #[case(Some(20), 100, 20)]
    #[case(Some(0), 100, 1)]
    #[case(Some(-5), 100, 1)]
    #[case(Some(10_000), 100, MAX_PAGE_SIZE)]
    fn test_clamp_limit(#[case] requested: Option<i64>, #[case] default: i64, #[case] expected: i64) {
        assert_eq!(clamp_limit(requested, default), expected);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(" ".to_string())), None);
        assert_eq!(non_empty(Some("g1".to_string())), Some("g1".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
