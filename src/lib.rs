// Library crate for the ArenaFA standings service
// This file exposes the public API for integration tests

pub mod config;
pub mod directory;
pub mod highlights;
pub mod leaderboard;
pub mod participation;
pub mod router;
pub mod shared;
pub mod tournament;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use leaderboard::{
    aggregate_scores, rank_totals, AggregateEntry, GlobalStandings, LeaderboardError,
    LeaderboardService, StandingsSource,
};
pub use router::build_router;
pub use shared::{AppError, AppState};
