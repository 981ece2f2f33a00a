use serde::{Deserialize, Serialize};

/// Glicko-2 state for one player: rating, rating deviation, volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerRating {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    pub fn score(&self) -> f64 {
        match self {
            MatchOutcome::Win => 1.0,
            MatchOutcome::Draw => 0.5,
            MatchOutcome::Loss => 0.0,
        }
    }
}

/// One game inside a rating period, seen from the player being updated.
/// All results in a period are evaluated against the player's pre-period
/// rating, never against intermediate values.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub opponent_rating: f64,
    pub opponent_deviation: f64,
    pub outcome: MatchOutcome,
}
