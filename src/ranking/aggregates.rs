use std::collections::HashMap;

use crate::config::settings::RankingSettings;
use crate::domain::models::{MatchRecord, PlayerId, TournamentPlacement};

/// Count tables shared by the composite ranking consumers.
///
/// A pure function of the match and placement lists; rebuild whenever either
/// changes.
#[derive(Debug, Default)]
pub struct PlayerAggregates {
    total_matches: HashMap<PlayerId, i32>,
    total_wins: HashMap<PlayerId, i32>,
    opponent_matches: HashMap<PlayerId, HashMap<PlayerId, i32>>,
    directed_wins: HashMap<PlayerId, HashMap<PlayerId, i32>>,
    tournament_wins: HashMap<PlayerId, i32>,
    tournament_participations: HashMap<PlayerId, i32>,
    bonus_wins: HashMap<PlayerId, i32>,
}

impl PlayerAggregates {
    pub fn matches_for(&self, player: PlayerId) -> i32 {
        *self.total_matches.get(&player).unwrap_or(&0)
    }

    pub fn wins_for(&self, player: PlayerId) -> i32 {
        *self.total_wins.get(&player).unwrap_or(&0)
    }

    /// Head-to-head match count between two players.
    pub fn encounters(&self, player: PlayerId, opponent: PlayerId) -> i32 {
        nested_count(&self.opponent_matches, player, opponent)
    }

    /// Wins of `player` over `opponent` specifically.
    pub fn wins_against(&self, player: PlayerId, opponent: PlayerId) -> i32 {
        nested_count(&self.directed_wins, player, opponent)
    }

    pub fn opponents_of(&self, player: PlayerId) -> Option<&HashMap<PlayerId, i32>> {
        self.opponent_matches.get(&player)
    }

    pub fn tournament_wins_for(&self, player: PlayerId) -> i32 {
        *self.tournament_wins.get(&player).unwrap_or(&0)
    }

    pub fn tournament_participations_for(&self, player: PlayerId) -> i32 {
        *self.tournament_participations.get(&player).unwrap_or(&0)
    }

    /// Synthetic win credit earned from tournament finishes.
    pub fn bonus_wins_for(&self, player: PlayerId) -> i32 {
        *self.bonus_wins.get(&player).unwrap_or(&0)
    }
}

pub fn build_aggregates(
    matches: &[MatchRecord],
    placements: &[TournamentPlacement],
    settings: &RankingSettings,
) -> PlayerAggregates {
    let mut aggregates = PlayerAggregates::default();

    for record in matches {
        increment(&mut aggregates.total_matches, record.player1_id, 1);
        increment(&mut aggregates.total_matches, record.player2_id, 1);

        increment_nested(
            &mut aggregates.opponent_matches,
            record.player1_id,
            record.player2_id,
            1,
        );
        increment_nested(
            &mut aggregates.opponent_matches,
            record.player2_id,
            record.player1_id,
            1,
        );

        increment(&mut aggregates.total_wins, record.winner_id, 1);
        increment_nested(
            &mut aggregates.directed_wins,
            record.winner_id,
            record.loser_id(),
            1,
        );
    }

    for placement in placements {
        // Participation counts for any placement; only 1st and 2nd carry credit.
        increment(
            &mut aggregates.tournament_participations,
            placement.player_id,
            1,
        );

        if placement.placement == 1 {
            increment(&mut aggregates.tournament_wins, placement.player_id, 1);
            increment(
                &mut aggregates.bonus_wins,
                placement.player_id,
                settings.first_place_bonus_wins,
            );
        } else if placement.placement == 2 {
            increment(
                &mut aggregates.bonus_wins,
                placement.player_id,
                settings.second_place_bonus_wins,
            );
        }
    }

    aggregates
}

fn increment(map: &mut HashMap<PlayerId, i32>, key: PlayerId, amount: i32) {
    *map.entry(key).or_insert(0) += amount;
}

fn increment_nested(
    map: &mut HashMap<PlayerId, HashMap<PlayerId, i32>>,
    outer: PlayerId,
    inner: PlayerId,
    amount: i32,
) {
    *map.entry(outer).or_default().entry(inner).or_insert(0) += amount;
}

fn nested_count(
    map: &HashMap<PlayerId, HashMap<PlayerId, i32>>,
    outer: PlayerId,
    inner: PlayerId,
) -> i32 {
    map.get(&outer)
        .and_then(|nested| nested.get(&inner))
        .copied()
        .unwrap_or(0)
}
