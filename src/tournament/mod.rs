pub mod models;
pub mod repository;

pub use models::{TournamentMeta, TournamentStatus, TournamentSummary};
pub use repository::{InMemoryTournamentRepository, PostgresTournamentRepository, TournamentRepository};
