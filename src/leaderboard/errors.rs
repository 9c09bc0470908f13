use thiserror::Error;

use crate::shared::AppError;

#[derive(Debug, Error, PartialEq)]
pub enum LeaderboardError {
    /// An upstream read failed; the board can't be built without guessing
    #[error("Leaderboard unavailable: {0}")]
    Unavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl LeaderboardError {
    /// Wraps a store failure with the name of the lookup that failed.
    pub fn unavailable(lookup: &'static str) -> impl FnOnce(AppError) -> Self {
        move |err| LeaderboardError::Unavailable(format!("{} lookup failed: {}", lookup, err))
    }
}

impl From<LeaderboardError> for AppError {
    fn from(err: LeaderboardError) -> Self {
        match err {
            LeaderboardError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            LeaderboardError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}
