use std::collections::HashMap;

use crate::config::settings::AppConfig;
use crate::domain::models::{MatchRecord, Player, PlayerId, TournamentPlacement};
use crate::rating::types::PlayerRating;

use super::composite;
use super::types::RankedPlayer;

/// The two live scoring systems, kept as independent strategies. The
/// persisted Glicko-2 rating and the display-oriented composite score are
/// never blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingStrategy {
    CompositeScore,
    GlickoRating,
}

/// Order the leaderboard with the chosen strategy.
///
/// `ratings` is the persisted Glicko-2 state; players absent from it rank at
/// the default rating. Both strategies keep input order on exact ties.
pub fn rank_leaderboard(
    strategy: RankingStrategy,
    players: &[Player],
    matches: &[MatchRecord],
    placements: &[TournamentPlacement],
    ratings: &HashMap<PlayerId, PlayerRating>,
    config: &AppConfig,
) -> Vec<RankedPlayer> {
    match strategy {
        RankingStrategy::CompositeScore => {
            composite::rank_players(players, matches, placements, &config.ranking)
        }
        RankingStrategy::GlickoRating => {
            let stats =
                composite::calculate_player_stats(players, matches, placements, &config.ranking);

            let mut ranked: Vec<RankedPlayer> = stats
                .into_iter()
                .map(|stats| {
                    let ranking_score = ratings
                        .get(&stats.player_id)
                        .map(|rating| rating.rating)
                        .unwrap_or(config.glicko.default_rating);
                    RankedPlayer {
                        stats,
                        ranking_score,
                    }
                })
                .collect();

            ranked.sort_by(|a, b| b.ranking_score.total_cmp(&a.ranking_score));
            ranked
        }
    }
}
