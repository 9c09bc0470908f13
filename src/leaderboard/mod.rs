pub mod aggregator;
pub mod ranker;
pub mod repository;
pub mod service;

mod errors;
mod handlers;
pub mod models;
pub mod types;

pub use aggregator::aggregate_scores;
pub use errors::LeaderboardError;
pub use handlers::{global_leaderboard, tournament_leaderboard, weekly_leaderboard};
pub use models::*;
pub use ranker::{rank_by_score, rank_totals, Ranked, Scored};
pub use repository::{
    InMemoryPrecomputedLeaderboardRepository, PostgresPrecomputedLeaderboardRepository,
    PrecomputedLeaderboardRepository,
};
pub use service::{LeaderboardService, LeaderboardServiceBuilder};
