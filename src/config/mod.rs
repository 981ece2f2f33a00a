pub mod settings;

pub use settings::{AppConfig, GlickoSettings, PlacementSettings, RankingSettings};
