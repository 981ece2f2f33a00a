pub mod glicko2;
pub mod types;

pub use glicko2::{
    apply_inactivity_decay, default_rating, expected_score, rating_change, update_rating,
};
pub use types::{MatchOutcome, MatchResult, PlayerRating};
