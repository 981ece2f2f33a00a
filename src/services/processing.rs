use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::settings::AppConfig;
use crate::domain::models::{
    MatchRecord, OutcomeTag, PlayerId, RatingUpdateContext, RatingUpdateResult,
    TournamentPlacement,
};
use crate::rating::glicko2;
use crate::rating::types::{MatchOutcome, MatchResult, PlayerRating};

use super::store::RatingStore;

/// Counters from a full history replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationSummary {
    pub players_initialized: usize,
    pub matches_processed: usize,
    pub placements_processed: usize,
}

/// Both sides of a processed match.
#[derive(Debug, Clone)]
pub struct MatchRatingUpdate {
    pub winner: RatingUpdateResult,
    pub loser: RatingUpdateResult,
}

/// Replays match and placement history through the Glicko-2 engine and
/// persists the results.
///
/// Strictly sequential: each update depends on the persisted outcome of all
/// earlier ones, so this must run as a single exclusive operation. Any store
/// failure aborts the remaining batch; progress up to that point is kept.
pub struct ProcessingService {
    config: AppConfig,
}

impl ProcessingService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Full re-migration: reset every player to the default rating, then
    /// replay all matches and qualifying placements in chronological order.
    /// Deterministic — the same inputs always produce the same ratings.
    pub fn run<S: RatingStore>(&self, store: &mut S) -> Result<MigrationSummary> {
        info!("=== Starting rating migration ===");

        let players_initialized = self.initialize_all_player_ratings(store)?;
        info!("  → Initialized {} player ratings", players_initialized);

        let matches = store.list_matches_chronological()?;
        let mut matches_processed = 0;
        for record in &matches {
            self.process_match_rating(store, record)?;
            matches_processed += 1;
        }
        info!("  → Processed {} matches", matches_processed);

        let placements =
            store.list_placements_chronological(self.config.placement.max_scored_placement)?;
        let mut placements_processed = 0;
        for placement in &placements {
            if self
                .process_tournament_placement_rating(store, placement)?
                .is_some()
            {
                placements_processed += 1;
            }
        }
        info!("  → Processed {} tournament placements", placements_processed);

        info!("=== Migration complete ===");
        Ok(MigrationSummary {
            players_initialized,
            matches_processed,
            placements_processed,
        })
    }

    /// Reset every known player to the default rating. No history rows.
    pub fn initialize_all_player_ratings<S: RatingStore>(&self, store: &mut S) -> Result<usize> {
        let players = store.list_players()?;
        let default = glicko2::default_rating(&self.config.glicko);

        for player in &players {
            store.put_rating(player.id, &default)?;
        }

        Ok(players.len())
    }

    /// Rate one match: a single-game Glicko-2 period per participant, both
    /// evaluated against the opponent's pre-match snapshot, then persisted
    /// with audit rows.
    pub fn process_match_rating<S: RatingStore>(
        &self,
        store: &mut S,
        record: &MatchRecord,
    ) -> Result<MatchRatingUpdate> {
        record.validate()?;

        let winner_id = record.winner_id;
        let loser_id = record.loser_id();

        let winner_before = self.rating_or_default(store, winner_id)?;
        let loser_before = self.rating_or_default(store, loser_id)?;

        let winner_after = glicko2::update_rating(
            &winner_before,
            &[MatchResult {
                opponent_rating: loser_before.rating,
                opponent_deviation: loser_before.deviation,
                outcome: MatchOutcome::Win,
            }],
            &self.config.glicko,
        );
        let loser_after = glicko2::update_rating(
            &loser_before,
            &[MatchResult {
                opponent_rating: winner_before.rating,
                opponent_deviation: winner_before.deviation,
                outcome: MatchOutcome::Loss,
            }],
            &self.config.glicko,
        );

        store.save_rating(
            winner_id,
            &winner_before,
            &winner_after,
            &RatingUpdateContext::for_match(record.id, loser_id, OutcomeTag::Win),
        )?;
        store.save_rating(
            loser_id,
            &loser_before,
            &loser_after,
            &RatingUpdateContext::for_match(record.id, winner_id, OutcomeTag::Loss),
        )?;

        Ok(MatchRatingUpdate {
            winner: update_result(winner_id, &winner_before, &winner_after),
            loser: update_result(loser_id, &loser_before, &loser_after),
        })
    }

    /// Rate a tournament placement as a virtual match: a win against a
    /// synthetic opponent at the field-average rating plus a margin for the
    /// placement. Placements outside the scored range are a no-op.
    pub fn process_tournament_placement_rating<S: RatingStore>(
        &self,
        store: &mut S,
        placement: &TournamentPlacement,
    ) -> Result<Option<RatingUpdateResult>> {
        let settings = &self.config.placement;
        if placement.placement > settings.max_scored_placement {
            return Ok(None);
        }

        let (margin, tag) = match placement.placement {
            1 => (settings.first_place_margin, OutcomeTag::TournamentFirst),
            2 => (settings.second_place_margin, OutcomeTag::TournamentSecond),
            3 => (0.0, OutcomeTag::TournamentThird),
            _ => return Ok(None),
        };

        let before = self.rating_or_default(store, placement.player_id)?;
        let field_average = self.average_field_rating(store, placement.tournament_id)?;

        let after = glicko2::update_rating(
            &before,
            &[MatchResult {
                opponent_rating: field_average + margin,
                opponent_deviation: settings.virtual_opponent_deviation,
                outcome: MatchOutcome::Win,
            }],
            &self.config.glicko,
        );

        store.save_rating(
            placement.player_id,
            &before,
            &after,
            &RatingUpdateContext::for_tournament(placement.tournament_id, tag),
        )?;

        Ok(Some(update_result(placement.player_id, &before, &after)))
    }

    /// Mean current rating of everyone placed in the tournament, recomputed
    /// at call time. An empty field falls back to the default rating.
    fn average_field_rating<S: RatingStore>(
        &self,
        store: &mut S,
        tournament_id: i64,
    ) -> Result<f64> {
        let placements = store.list_placements_for_tournament(tournament_id)?;
        if placements.is_empty() {
            return Ok(self.config.glicko.default_rating);
        }

        let mut total = 0.0;
        for placement in &placements {
            total += self.rating_or_default(store, placement.player_id)?.rating;
        }

        Ok(total / placements.len() as f64)
    }

    fn rating_or_default<S: RatingStore>(
        &self,
        store: &mut S,
        player_id: PlayerId,
    ) -> Result<PlayerRating> {
        Ok(store
            .get_rating(player_id)?
            .unwrap_or_else(|| glicko2::default_rating(&self.config.glicko)))
    }
}

fn update_result(
    player_id: PlayerId,
    before: &PlayerRating,
    after: &PlayerRating,
) -> RatingUpdateResult {
    RatingUpdateResult {
        player_id,
        rating_before: before.rating,
        rating_after: after.rating,
        rating_change: after.rating - before.rating,
        rd_before: before.deviation,
        rd_after: after.deviation,
        volatility_before: before.volatility,
        volatility_after: after.volatility,
    }
}
