use std::collections::{BTreeMap, HashMap};

use super::models::ScoreTotal;
use crate::participation::ParticipationRecord;
use crate::tournament::TournamentMeta;

/// Sums participation scores per (user, game).
///
/// Records whose tournament has no entry in `meta` can't be attributed to a
/// game and are dropped. Null scores count as zero. Output is ordered by
/// (user_id, game_id) so equal inputs give equal outputs whatever their order.
pub fn aggregate_scores(records: &[ParticipationRecord], meta: &[TournamentMeta]) -> Vec<ScoreTotal> {
    let tournament_games: HashMap<&str, &str> = meta
        .iter()
        .map(|m| (m.tournament_id.as_str(), m.game_id.as_str()))
        .collect();

    let mut totals: BTreeMap<(&str, &str), i64> = BTreeMap::new();

    for record in records {
        let Some(&game_id) = tournament_games.get(record.tournament_id.as_str()) else {
            continue;
        };

        let total = totals.entry((record.user_id.as_str(), game_id)).or_insert(0);
        *total = total.saturating_add(record.score.unwrap_or(0));
    }

    totals
        .into_iter()
        .map(|((user_id, game_id), total_score)| ScoreTotal {
            user_id: user_id.to_string(),
            game_id: game_id.to_string(),
            total_score,
        })
        .collect()
}
