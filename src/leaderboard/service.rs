use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::{
    aggregator::aggregate_scores,
    models::{
        AggregateEntry, GlobalStandingRow, GlobalStandings, HighlightRow, StandingsFilter,
        StandingsSource, TournamentStandingRow,
    },
    ranker::rank_totals,
    repository::{InMemoryPrecomputedLeaderboardRepository, PrecomputedLeaderboardRepository},
    LeaderboardError,
};
use crate::{
    config::DEFAULT_PARTICIPATION_ROW_LIMIT,
    directory::DisplayNameResolver,
    highlights::{HighlightFilter, HighlightRepository, InMemoryHighlightRepository},
    participation::{ParticipantFilter, ParticipationFilter, ParticipationRepository},
    shared::AppState,
    tournament::TournamentRepository,
};

/// Builds the three leaderboard views from the store adapters
pub struct LeaderboardService {
    participation: Arc<dyn ParticipationRepository>,
    tournaments: Arc<dyn TournamentRepository>,
    directory: Arc<dyn DisplayNameResolver>,
    precomputed: Arc<dyn PrecomputedLeaderboardRepository>,
    highlights: Arc<dyn HighlightRepository>,
    participation_row_limit: i64,
}

impl LeaderboardService {
    pub fn builder(
        participation: Arc<dyn ParticipationRepository>,
        tournaments: Arc<dyn TournamentRepository>,
        directory: Arc<dyn DisplayNameResolver>,
    ) -> LeaderboardServiceBuilder {
        LeaderboardServiceBuilder::new(participation, tournaments, directory)
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::builder(
            Arc::clone(&state.participation_repository),
            Arc::clone(&state.tournament_repository),
            Arc::clone(&state.display_name_resolver),
        )
        .with_precomputed(Arc::clone(&state.precomputed_leaderboard_repository))
        .with_highlights(Arc::clone(&state.highlight_repository))
        .with_participation_row_limit(state.config.participation_row_limit)
        .build()
    }

    /// Global (user, game) standings
    ///
    /// Uses the precomputed table when it has rows; otherwise aggregates and
    /// ranks participation rows. The result carries which path was taken.
    #[instrument(skip(self))]
    pub async fn global_standings(
        &self,
        filter: &StandingsFilter,
    ) -> Result<GlobalStandings, LeaderboardError> {
        let (source, entries) = match self.precomputed.top_entries(filter).await {
            Ok(entries) if !entries.is_empty() => {
                debug!(row_count = entries.len(), "Using precomputed leaderboard");
                (StandingsSource::Precomputed, entries)
            }
            Ok(_) => {
                info!("Precomputed leaderboard is empty, computing from participation");
                (StandingsSource::Computed, self.compute_standings(filter).await?)
            }
            Err(err) => {
                warn!(error = %err, "Precomputed leaderboard unavailable, computing from participation");
                (StandingsSource::Computed, self.compute_standings(filter).await?)
            }
        };

        let rows = self.label_global_rows(entries).await?;

        info!(%source, row_count = rows.len(), "Global standings built");
        Ok(GlobalStandings { source, rows })
    }

    /// Aggregates and ranks raw participation rows
    #[instrument(skip(self))]
    pub async fn compute_standings(
        &self,
        filter: &StandingsFilter,
    ) -> Result<Vec<AggregateEntry>, LeaderboardError> {
        let records = self
            .participation
            .list_participation(&ParticipationFilter {
                game_id: filter.game_id.clone(),
                limit: self.participation_row_limit,
            })
            .await
            .map_err(LeaderboardError::unavailable("participation"))?;

        let tournament_ids = unique_ids(records.iter().map(|r| Some(r.tournament_id.as_str())));
        let meta = self
            .tournaments
            .game_map(&tournament_ids)
            .await
            .map_err(LeaderboardError::unavailable("tournament"))?;

        let mut totals = aggregate_scores(&records, &meta);
        if let Some(game_id) = &filter.game_id {
            totals.retain(|t| &t.game_id == game_id);
        }

        // Truncate after ranking so ranks reflect the whole field
        let mut ranked = rank_totals(totals);
        ranked.truncate(filter.limit);

        debug!(
            record_count = records.len(),
            tournament_count = meta.len(),
            entry_count = ranked.len(),
            "Computed standings from participation"
        );
        Ok(ranked)
    }

    /// Highest individual participation scores, labelled with player and tournament
    #[instrument(skip(self))]
    pub async fn tournament_standings(
        &self,
        filter: &ParticipantFilter,
    ) -> Result<Vec<TournamentStandingRow>, LeaderboardError> {
        let participants = self
            .participation
            .top_participants(filter)
            .await
            .map_err(LeaderboardError::unavailable("participation"))?;

        let user_ids = unique_ids(participants.iter().map(|p| Some(p.user_id.as_str())));
        let tournament_ids =
            unique_ids(participants.iter().map(|p| Some(p.tournament_id.as_str())));

        let (names, summaries) = futures::try_join!(
            async {
                self.directory
                    .resolve_display_names(&user_ids, &[])
                    .await
                    .map_err(LeaderboardError::unavailable("display name"))
            },
            async {
                self.tournaments
                    .summaries(&tournament_ids)
                    .await
                    .map_err(LeaderboardError::unavailable("tournament"))
            },
        )?;

        let rows: Vec<TournamentStandingRow> = participants
            .into_iter()
            .map(|p| {
                let summary = summaries.iter().find(|s| s.id == p.tournament_id);
                TournamentStandingRow {
                    player: names.username(&p.user_id),
                    tournament: summary.and_then(|s| s.title.clone()),
                    status: summary.and_then(|s| s.status),
                    user_id: p.user_id,
                    tournament_id: p.tournament_id,
                    score: p.score,
                    rank: p.rank,
                }
            })
            .collect();

        info!(row_count = rows.len(), "Tournament standings built");
        Ok(rows)
    }

    /// Newest weekly highlights, labelled with player and game
    #[instrument(skip(self))]
    pub async fn weekly_highlights(
        &self,
        filter: &HighlightFilter,
    ) -> Result<Vec<HighlightRow>, LeaderboardError> {
        let highlights = self
            .highlights
            .recent_highlights(filter)
            .await
            .map_err(LeaderboardError::unavailable("highlight"))?;

        let user_ids = unique_ids(highlights.iter().map(|h| h.user_id.as_deref()));
        let game_ids = unique_ids(highlights.iter().map(|h| h.game_id.as_deref()));

        let names = self
            .directory
            .resolve_display_names(&user_ids, &game_ids)
            .await
            .map_err(LeaderboardError::unavailable("display name"))?;

        let rows: Vec<HighlightRow> = highlights
            .into_iter()
            .map(|h| HighlightRow {
                player: h.user_id.as_deref().and_then(|id| names.username(id)),
                game: h.game_id.as_deref().and_then(|id| names.game_title(id)),
                id: h.id,
                kind: h.kind,
                week_start: h.week_start,
                reason: h.reason,
                user_id: h.user_id,
                game_id: h.game_id,
            })
            .collect();

        info!(row_count = rows.len(), "Weekly highlights built");
        Ok(rows)
    }

    async fn label_global_rows(
        &self,
        entries: Vec<AggregateEntry>,
    ) -> Result<Vec<GlobalStandingRow>, LeaderboardError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids = unique_ids(entries.iter().map(|e| Some(e.user_id.as_str())));
        let game_ids = unique_ids(entries.iter().map(|e| Some(e.game_id.as_str())));

        let names = self
            .directory
            .resolve_display_names(&user_ids, &game_ids)
            .await
            .map_err(LeaderboardError::unavailable("display name"))?;

        Ok(entries
            .into_iter()
            .map(|e| GlobalStandingRow {
                player: names.username(&e.user_id),
                game: names.game_title(&e.game_id),
                user_id: e.user_id,
                game_id: e.game_id,
                total_score: e.total_score,
                rank: e.rank,
            })
            .collect())
    }
}

/// Distinct non-empty ids, sorted
fn unique_ids<'a>(ids: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    ids.flatten()
        .filter(|id| !id.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub struct LeaderboardServiceBuilder {
    participation: Arc<dyn ParticipationRepository>,
    tournaments: Arc<dyn TournamentRepository>,
    directory: Arc<dyn DisplayNameResolver>,
    precomputed: Arc<dyn PrecomputedLeaderboardRepository>,
    highlights: Arc<dyn HighlightRepository>,
    participation_row_limit: i64,
}

impl LeaderboardServiceBuilder {
    fn new(
        participation: Arc<dyn ParticipationRepository>,
        tournaments: Arc<dyn TournamentRepository>,
        directory: Arc<dyn DisplayNameResolver>,
    ) -> Self {
        Self {
            participation,
            tournaments,
            directory,
            precomputed: Arc::new(InMemoryPrecomputedLeaderboardRepository::new()),
            highlights: Arc::new(InMemoryHighlightRepository::new()),
            participation_row_limit: DEFAULT_PARTICIPATION_ROW_LIMIT,
        }
    }

    pub fn with_precomputed(mut self, precomputed: Arc<dyn PrecomputedLeaderboardRepository>) -> Self {
        self.precomputed = precomputed;
        self
    }

    pub fn with_highlights(mut self, highlights: Arc<dyn HighlightRepository>) -> Self {
        self.highlights = highlights;
        self
    }

    pub fn with_participation_row_limit(mut self, limit: i64) -> Self {
        self.participation_row_limit = limit;
        self
    }

    pub fn build(self) -> LeaderboardService {
        LeaderboardService {
            participation: self.participation,
            tournaments: self.tournaments,
            directory: self.directory,
            precomputed: self.precomputed,
            highlights: self.highlights,
            participation_row_limit: self.participation_row_limit,
        }
    }
}
