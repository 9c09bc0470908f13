use std::sync::Arc;

use arenafa::{
    build_router,
    directory::{InMemoryDisplayNameResolver, PostgresDisplayNameResolver},
    highlights::{InMemoryHighlightRepository, PostgresHighlightRepository},
    leaderboard::{
        InMemoryPrecomputedLeaderboardRepository, PostgresPrecomputedLeaderboardRepository,
    },
    participation::{InMemoryParticipationRepository, PostgresParticipationRepository},
    tournament::{InMemoryTournamentRepository, PostgresTournamentRepository},
    AppConfig, AppState,
};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arenafa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ArenaFA standings service");

    let config = AppConfig::from_env()?;

    let app_state = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;
            info!(
                max_connections = config.database_max_connections,
                "Connected to PostgreSQL"
            );

            AppState::new(
                Arc::new(PostgresParticipationRepository::new(pool.clone())),
                Arc::new(PostgresTournamentRepository::new(pool.clone())),
                Arc::new(PostgresDisplayNameResolver::new(pool.clone())),
                Arc::new(PostgresPrecomputedLeaderboardRepository::new(pool.clone())),
                Arc::new(PostgresHighlightRepository::new(pool)),
                config.clone(),
            )
        }
        None => {
            warn!("DATABASE_URL not set, serving empty in-memory repositories");
            AppState::new(
                Arc::new(InMemoryParticipationRepository::new()),
                Arc::new(InMemoryTournamentRepository::new()),
                Arc::new(InMemoryDisplayNameResolver::new()),
                Arc::new(InMemoryPrecomputedLeaderboardRepository::new()),
                Arc::new(InMemoryHighlightRepository::new()),
                config.clone(),
            )
        }
    };

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
