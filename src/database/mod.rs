pub mod connection;
pub mod matches;
pub mod placements;
pub mod players;
pub mod ratings;
pub mod setup;
pub mod tournaments;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};

use anyhow::Result;
use chrono::Utc;

use crate::domain::models::{
    MatchRecord, Player, PlayerId, RatingHistoryEntry, RatingUpdateContext, TournamentPlacement,
};
use crate::rating::types::PlayerRating;
use crate::services::store::RatingStore;

/// SQLite-backed implementation of the persistence collaborator.
pub struct SqliteStore {
    conn: DbConn,
}

impl SqliteStore {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    pub fn connection(&mut self) -> &mut DbConn {
        &mut self.conn
    }
}

impl RatingStore for SqliteStore {
    fn get_rating(&mut self, player_id: PlayerId) -> Result<Option<PlayerRating>> {
        ratings::get_rating(&mut self.conn, player_id)
    }

    fn put_rating(&mut self, player_id: PlayerId, rating: &PlayerRating) -> Result<()> {
        ratings::upsert_rating(&mut self.conn, player_id, rating, Utc::now())
    }

    fn save_rating(
        &mut self,
        player_id: PlayerId,
        old: &PlayerRating,
        new: &PlayerRating,
        context: &RatingUpdateContext,
    ) -> Result<()> {
        let now = Utc::now();
        ratings::upsert_rating(&mut self.conn, player_id, new, now)?;
        ratings::insert_history(
            &mut self.conn,
            &RatingHistoryEntry {
                player_id,
                match_id: context.match_id,
                tournament_id: context.tournament_id,
                opponent_id: context.opponent_id,
                rating_before: old.rating,
                rating_after: new.rating,
                rating_change: new.rating - old.rating,
                rd_before: old.deviation,
                rd_after: new.deviation,
                volatility_before: old.volatility,
                volatility_after: new.volatility,
                result: context.outcome.as_str().to_string(),
            },
            now,
        )
    }

    fn list_players(&mut self) -> Result<Vec<Player>> {
        players::list_all(&mut self.conn)
    }

    fn list_matches_chronological(&mut self) -> Result<Vec<MatchRecord>> {
        matches::list_chronological(&mut self.conn)
    }

    fn list_placements_chronological(
        &mut self,
        max_placement: i32,
    ) -> Result<Vec<TournamentPlacement>> {
        placements::list_scored_chronological(&mut self.conn, max_placement)
    }

    fn list_placements_for_tournament(
        &mut self,
        tournament_id: i64,
    ) -> Result<Vec<TournamentPlacement>> {
        placements::list_by_tournament(&mut self.conn, tournament_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::AppConfig;
    use crate::domain::models::Tournament;
    use crate::services::processing::ProcessingService;
    use chrono::TimeZone;

    fn open_store() -> SqliteStore {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        setup::reset_database(&mut conn).unwrap();
        SqliteStore::new(conn)
    }

    fn at(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 19, 0, 0).unwrap()
    }

    fn player(id: PlayerId, name: &str) -> Player {
        Player {
            id,
            name: name.to_string(),
            avatar_url: None,
            created_at: at(1),
        }
    }

    fn seed(store: &mut SqliteStore) {
        players::insert_player(store.connection(), &player(1, "Ada")).unwrap();
        players::insert_player(store.connection(), &player(2, "Ben")).unwrap();
        tournaments::insert_tournament(
            store.connection(),
            &Tournament {
                id: 10,
                name: "May Open".to_string(),
                tournament_date: at(20),
            },
        )
        .unwrap();
        matches::insert_match(
            store.connection(),
            &MatchRecord {
                id: 1,
                player1_id: 1,
                player2_id: 2,
                winner_id: 1,
                played_at: at(5),
                note: Some("final frame".to_string()),
            },
        )
        .unwrap();
        matches::insert_match(
            store.connection(),
            &MatchRecord {
                id: 2,
                player1_id: 1,
                player2_id: 2,
                winner_id: 2,
                played_at: at(3),
                note: None,
            },
        )
        .unwrap();
        placements::insert_placement(
            store.connection(),
            &TournamentPlacement {
                id: 1,
                player_id: 1,
                tournament_id: 10,
                placement: 1,
                created_at: at(20),
            },
        )
        .unwrap();
        placements::insert_placement(
            store.connection(),
            &TournamentPlacement {
                id: 2,
                player_id: 2,
                tournament_id: 10,
                placement: 6,
                created_at: at(20),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_rating_roundtrip_and_history() {
        let mut store = open_store();
        seed(&mut store);

        assert!(store.get_rating(1).unwrap().is_none());

        let old = PlayerRating {
            rating: 1500.0,
            deviation: 350.0,
            volatility: 0.06,
        };
        let new = PlayerRating {
            rating: 1612.5,
            deviation: 290.0,
            volatility: 0.0599,
        };
        store
            .save_rating(
                1,
                &old,
                &new,
                &RatingUpdateContext::for_match(1, 2, crate::domain::models::OutcomeTag::Win),
            )
            .unwrap();

        let stored = store.get_rating(1).unwrap().unwrap();
        assert!((stored.rating - 1612.5).abs() < 1e-9);
        assert!((stored.deviation - 290.0).abs() < 1e-9);

        let history = ratings::list_history_for_player(store.connection(), 1).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].result, "win");
        assert_eq!(history[0].match_id, Some(1));
        assert!((history[0].rating_change - 112.5).abs() < 1e-9);
    }

    #[test]
    fn test_readers_order_and_filter() {
        let mut store = open_store();
        seed(&mut store);

        let matches = store.list_matches_chronological().unwrap();
        assert_eq!(matches.len(), 2);
        // Match 2 was played earlier even though it was inserted later.
        assert_eq!(matches[0].id, 2);
        assert_eq!(matches[1].note.as_deref(), Some("final frame"));

        let scored = store.list_placements_chronological(3).unwrap();
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].player_id, 1);

        let field = store.list_placements_for_tournament(10).unwrap();
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_full_migration_against_sqlite() {
        let mut store = open_store();
        seed(&mut store);

        let summary = ProcessingService::new(AppConfig::new())
            .run(&mut store)
            .unwrap();

        assert_eq!(summary.players_initialized, 2);
        assert_eq!(summary.matches_processed, 2);
        assert_eq!(summary.placements_processed, 1);

        let ada = store.get_rating(1).unwrap().unwrap();
        let ben = store.get_rating(2).unwrap().unwrap();
        // Ada lost first, won second, then took the tournament.
        assert!(ada.rating > ben.rating);
        assert!(ada.deviation < 350.0);

        let history = ratings::list_history_for_player(store.connection(), 1).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].result, "tournament_1st");
    }
}
