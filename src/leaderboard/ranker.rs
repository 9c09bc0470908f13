use super::models::{AggregateEntry, ScoreTotal};

/// Anything that can be placed on a leaderboard by score
pub trait Scored {
    fn score(&self) -> i64;
}

impl Scored for ScoreTotal {
    fn score(&self) -> i64 {
        self.total_score
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked<T> {
    pub rank: u32,
    pub entry: T,
}

/// Sorts by score descending and assigns ranks.
///
/// Equal scores share a rank. The first entry of each lower score takes its
/// 1-based position, so 20, 20, 15 ranks as 1, 1, 3. The sort is stable:
/// tied entries keep their input order.
pub fn rank_by_score<T: Scored>(mut entries: Vec<T>) -> Vec<Ranked<T>> {
    entries.sort_by(|a, b| b.score().cmp(&a.score()));

    let mut rank = 0u32;
    let mut previous: Option<i64> = None;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let score = entry.score();
            if previous != Some(score) {
                rank = index as u32 + 1;
                previous = Some(score);
            }
            Ranked { rank, entry }
        })
        .collect()
}

pub fn rank_totals(totals: Vec<ScoreTotal>) -> Vec<AggregateEntry> {
    rank_by_score(totals)
        .into_iter()
        .map(|Ranked { rank, entry }| AggregateEntry {
            user_id: entry.user_id,
            game_id: entry.game_id,
            total_score: entry.total_score,
            rank: Some(rank),
        })
        .collect()
}
