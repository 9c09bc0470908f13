pub mod models;
pub mod repository;

pub use models::{ParticipantFilter, ParticipationFilter, ParticipationRecord, TournamentParticipant};
pub use repository::{
    InMemoryParticipationRepository, ParticipationRepository, PostgresParticipationRepository,
};
