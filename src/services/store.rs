use std::collections::HashMap;

use anyhow::Result;

use crate::domain::models::{
    MatchRecord, Player, PlayerId, RatingHistoryEntry, RatingUpdateContext, TournamentPlacement,
};
use crate::rating::types::PlayerRating;

/// Persistence collaborator for the rating pipeline.
///
/// The engine performs no I/O itself; everything the orchestrator reads or
/// writes goes through this trait. Retries, locking and transactions are the
/// implementor's concern — the orchestrator aborts on the first error.
pub trait RatingStore {
    fn get_rating(&mut self, player_id: PlayerId) -> Result<Option<PlayerRating>>;

    /// Upsert a rating without an audit row (initialization/reset path).
    fn put_rating(&mut self, player_id: PlayerId, rating: &PlayerRating) -> Result<()>;

    /// Upsert a rating and append one rating-history audit row.
    fn save_rating(
        &mut self,
        player_id: PlayerId,
        old: &PlayerRating,
        new: &PlayerRating,
        context: &RatingUpdateContext,
    ) -> Result<()>;

    fn list_players(&mut self) -> Result<Vec<Player>>;

    /// All matches, ascending by play time.
    fn list_matches_chronological(&mut self) -> Result<Vec<MatchRecord>>;

    /// Placements with rank at most `max_placement`, ascending by creation time.
    fn list_placements_chronological(
        &mut self,
        max_placement: i32,
    ) -> Result<Vec<TournamentPlacement>>;

    fn list_placements_for_tournament(
        &mut self,
        tournament_id: i64,
    ) -> Result<Vec<TournamentPlacement>>;
}

/// HashMap-backed store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub players: Vec<Player>,
    pub matches: Vec<MatchRecord>,
    pub placements: Vec<TournamentPlacement>,
    ratings: HashMap<PlayerId, PlayerRating>,
    history: Vec<RatingHistoryEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[RatingHistoryEntry] {
        &self.history
    }

    pub fn ratings(&self) -> &HashMap<PlayerId, PlayerRating> {
        &self.ratings
    }
}

impl RatingStore for MemoryStore {
    fn get_rating(&mut self, player_id: PlayerId) -> Result<Option<PlayerRating>> {
        Ok(self.ratings.get(&player_id).copied())
    }

    fn put_rating(&mut self, player_id: PlayerId, rating: &PlayerRating) -> Result<()> {
        self.ratings.insert(player_id, *rating);
        Ok(())
    }

    fn save_rating(
        &mut self,
        player_id: PlayerId,
        old: &PlayerRating,
        new: &PlayerRating,
        context: &RatingUpdateContext,
    ) -> Result<()> {
        self.ratings.insert(player_id, *new);
        self.history.push(RatingHistoryEntry {
            player_id,
            match_id: context.match_id,
            tournament_id: context.tournament_id,
            opponent_id: context.opponent_id,
            rating_before: old.rating,
            rating_after: new.rating,
            rating_change: new.rating - old.rating,
            rd_before: old.deviation,
            rd_after: new.deviation,
            volatility_before: old.volatility,
            volatility_after: new.volatility,
            result: context.outcome.as_str().to_string(),
        });
        Ok(())
    }

    fn list_players(&mut self) -> Result<Vec<Player>> {
        Ok(self.players.clone())
    }

    fn list_matches_chronological(&mut self) -> Result<Vec<MatchRecord>> {
        let mut matches = self.matches.clone();
        matches.sort_by_key(|m| (m.played_at, m.id));
        Ok(matches)
    }

    fn list_placements_chronological(
        &mut self,
        max_placement: i32,
    ) -> Result<Vec<TournamentPlacement>> {
        let mut placements: Vec<TournamentPlacement> = self
            .placements
            .iter()
            .filter(|p| p.placement <= max_placement)
            .cloned()
            .collect();
        placements.sort_by_key(|p| (p.created_at, p.id));
        Ok(placements)
    }

    fn list_placements_for_tournament(
        &mut self,
        tournament_id: i64,
    ) -> Result<Vec<TournamentPlacement>> {
        Ok(self
            .placements
            .iter()
            .filter(|p| p.tournament_id == tournament_id)
            .cloned()
            .collect())
    }
}
