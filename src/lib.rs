pub mod config;
pub mod database;
pub mod domain;
pub mod ranking;
pub mod rating;
pub mod services;

pub use config::settings::{AppConfig, GlickoSettings, PlacementSettings, RankingSettings};
pub use database::SqliteStore;
pub use domain::models::{
    MatchRecord, Player, PlayerId, RatingUpdateResult, Tournament, TournamentPlacement,
};
pub use ranking::{
    MonthlyHighlight, PlayerStats, RankedPlayer, RankingStrategy, calculate_player_stats,
    calculate_ranking_score, player_of_month, rank_leaderboard, rank_players,
};
pub use rating::{
    MatchOutcome, MatchResult, PlayerRating, apply_inactivity_decay, default_rating,
    expected_score, rating_change, update_rating,
};
pub use services::{MemoryStore, ProcessingService, RatingStore};
