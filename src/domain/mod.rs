pub mod models;

pub use models::{
    MatchRecord, OutcomeTag, Player, PlayerId, RatingHistoryEntry, RatingUpdateContext,
    RatingUpdateResult, Tournament, TournamentPlacement,
};
