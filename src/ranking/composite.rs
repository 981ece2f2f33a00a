use crate::config::settings::RankingSettings;
use crate::domain::models::{MatchRecord, Player, PlayerId, TournamentPlacement};

use super::aggregates::{PlayerAggregates, build_aggregates};
use super::types::{PlayerStats, RankedPlayer};

/// Win percentage pulled toward 50% by a prior of `prior_games` phantom
/// games, half of them wins. Returns exactly 50 when there is no data at all.
pub fn smoothed_win_percentage(wins: i32, games: i32, prior_games: i32) -> f64 {
    let prior_wins = prior_games as f64 * 0.5;
    let total_games = (games + prior_games) as f64;
    if total_games <= 0.0 {
        return 50.0;
    }

    (wins as f64 + prior_wins) / total_games * 100.0
}

/// An opponent's smoothed win percentage with the head-to-head record against
/// `excluded` removed, so a single rivalry cannot inflate itself.
fn opponent_smoothed_win_percentage(
    opponent: PlayerId,
    excluded: PlayerId,
    aggregates: &PlayerAggregates,
    settings: &RankingSettings,
) -> f64 {
    let games = aggregates.matches_for(opponent) - aggregates.encounters(opponent, excluded);
    let wins = aggregates.wins_for(opponent) - aggregates.wins_against(opponent, excluded);

    smoothed_win_percentage(wins, games, settings.min_games_for_ranking)
}

/// Encounter-weighted mean strength of a player's opposition. Players with
/// no matches score 50 by definition.
fn opponent_strength_percentage(
    player: PlayerId,
    aggregates: &PlayerAggregates,
    settings: &RankingSettings,
) -> f64 {
    let total_matches = aggregates.matches_for(player);
    if total_matches == 0 {
        return 50.0;
    }

    let Some(opponents) = aggregates.opponents_of(player) else {
        return 50.0;
    };
    if opponents.is_empty() {
        return 50.0;
    }

    let mut weighted_strength = 0.0;
    for (&opponent, &encounter_count) in opponents {
        let strength = opponent_smoothed_win_percentage(opponent, player, aggregates, settings);
        weighted_strength += strength * encounter_count as f64;
    }

    weighted_strength / total_matches as f64
}

fn stats_from_aggregates(players: &[Player], aggregates: &PlayerAggregates) -> Vec<PlayerStats> {
    players
        .iter()
        .map(|player| {
            let total_matches = aggregates.matches_for(player.id);
            let total_wins = aggregates.wins_for(player.id);

            PlayerStats {
                player_id: player.id,
                total_wins,
                total_losses: total_matches - total_wins,
                total_matches,
                win_percentage: if total_matches > 0 {
                    total_wins as f64 / total_matches as f64 * 100.0
                } else {
                    0.0
                },
                tournament_wins: aggregates.tournament_wins_for(player.id),
                tournament_participations: aggregates.tournament_participations_for(player.id),
            }
        })
        .collect()
}

fn score_from_aggregates(
    stats: &PlayerStats,
    aggregates: &PlayerAggregates,
    settings: &RankingSettings,
) -> f64 {
    // Bonus wins count as both a win and a game played, deliberately diluting
    // the shrinkage for players with many finishes but few matches.
    let bonus_wins = aggregates.bonus_wins_for(stats.player_id);
    let effective_wins = stats.total_wins + bonus_wins;
    let effective_games = stats.total_matches + bonus_wins;

    let adjusted_win_percentage =
        smoothed_win_percentage(effective_wins, effective_games, settings.min_games_for_ranking);
    let opponent_strength = opponent_strength_percentage(stats.player_id, aggregates, settings);

    adjusted_win_percentage * settings.self_weight + opponent_strength * settings.opponent_weight
}

/// Per-player display statistics, in input player order.
pub fn calculate_player_stats(
    players: &[Player],
    matches: &[MatchRecord],
    placements: &[TournamentPlacement],
    settings: &RankingSettings,
) -> Vec<PlayerStats> {
    let aggregates = build_aggregates(matches, placements, settings);
    stats_from_aggregates(players, &aggregates)
}

/// Composite leaderboard score for one player's stats.
pub fn calculate_ranking_score(
    stats: &PlayerStats,
    matches: &[MatchRecord],
    placements: &[TournamentPlacement],
    settings: &RankingSettings,
) -> f64 {
    let aggregates = build_aggregates(matches, placements, settings);
    score_from_aggregates(stats, &aggregates, settings)
}

/// All players ordered by composite score, descending. The sort is stable:
/// exact ties keep the input player order.
pub fn rank_players(
    players: &[Player],
    matches: &[MatchRecord],
    placements: &[TournamentPlacement],
    settings: &RankingSettings,
) -> Vec<RankedPlayer> {
    let aggregates = build_aggregates(matches, placements, settings);

    let mut ranked: Vec<RankedPlayer> = stats_from_aggregates(players, &aggregates)
        .into_iter()
        .map(|stats| {
            let ranking_score = score_from_aggregates(&stats, &aggregates, settings);
            RankedPlayer {
                stats,
                ranking_score,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.ranking_score.total_cmp(&a.ranking_score));
    ranked
}
