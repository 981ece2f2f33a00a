use serde::{Deserialize, Serialize};

use crate::domain::models::PlayerId;

/// Display statistics for one player, derived from the full match and
/// placement history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub total_wins: i32,
    pub total_losses: i32,
    pub total_matches: i32,
    /// Raw win percentage (0 when no matches), without smoothing.
    pub win_percentage: f64,
    pub tournament_wins: i32,
    pub tournament_participations: i32,
}

/// A player's stats together with the leaderboard score they are ordered by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub stats: PlayerStats,
    pub ranking_score: f64,
}
