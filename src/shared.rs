use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::directory::DisplayNameResolver;
use crate::highlights::HighlightRepository;
use crate::leaderboard::PrecomputedLeaderboardRepository;
use crate::participation::ParticipationRepository;
use crate::tournament::TournamentRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub participation_repository: Arc<dyn ParticipationRepository>,
    pub tournament_repository: Arc<dyn TournamentRepository>,
    pub display_name_resolver: Arc<dyn DisplayNameResolver>,
    pub precomputed_leaderboard_repository: Arc<dyn PrecomputedLeaderboardRepository>,
    pub highlight_repository: Arc<dyn HighlightRepository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        participation_repository: Arc<dyn ParticipationRepository>,
        tournament_repository: Arc<dyn TournamentRepository>,
        display_name_resolver: Arc<dyn DisplayNameResolver>,
        precomputed_leaderboard_repository: Arc<dyn PrecomputedLeaderboardRepository>,
        highlight_repository: Arc<dyn HighlightRepository>,
        config: AppConfig,
    ) -> Self {
        Self {
            participation_repository,
            tournament_repository,
            display_name_resolver,
            precomputed_leaderboard_repository,
            highlight_repository,
            config: Arc::new(config),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_service_unavailable_maps_to_503_with_json_body() {
        let response = AppError::ServiceUnavailable("participation lookup failed".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "participation lookup failed");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DatabaseError("x".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
