pub mod models;
pub mod repository;

pub use models::{HighlightFilter, HighlightKind, WeeklyHighlight};
pub use repository::{HighlightRepository, InMemoryHighlightRepository, PostgresHighlightRepository};
