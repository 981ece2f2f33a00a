pub mod processing;
pub mod store;

pub use processing::{MatchRatingUpdate, MigrationSummary, ProcessingService};
pub use store::{MemoryStore, RatingStore};
