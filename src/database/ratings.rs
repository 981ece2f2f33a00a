use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use crate::domain::models::{PlayerId, RatingHistoryEntry};
use crate::rating::types::PlayerRating;

pub fn get_rating(conn: &mut DbConn, player_id: PlayerId) -> Result<Option<PlayerRating>> {
    let sql =
        "SELECT rating, rating_deviation, volatility FROM player_ratings WHERE player_id = ?1";

    conn.query_row(sql, params![player_id], |row| {
        Ok(PlayerRating {
            rating: row.get(0)?,
            deviation: row.get(1)?,
            volatility: row.get(2)?,
        })
    })
    .optional()
    .context("Failed to query player rating")
}

pub fn upsert_rating(
    conn: &mut DbConn,
    player_id: PlayerId,
    rating: &PlayerRating,
    updated_at: DateTime<Utc>,
) -> Result<()> {
    let sql = "INSERT INTO player_ratings (player_id, rating, rating_deviation, volatility, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT(player_id) DO UPDATE SET rating = ?2, rating_deviation = ?3, volatility = ?4, updated_at = ?5";

    conn.execute(
        sql,
        params![
            player_id,
            rating.rating,
            rating.deviation,
            rating.volatility,
            updated_at
        ],
    )
    .context("Failed to upsert player rating")?;

    Ok(())
}

pub fn insert_history(
    conn: &mut DbConn,
    entry: &RatingHistoryEntry,
    created_at: DateTime<Utc>,
) -> Result<()> {
    let sql = "INSERT INTO rating_history (player_id, match_id, tournament_id, opponent_id, rating_before, rating_after, rating_change, rd_before, rd_after, volatility_before, volatility_after, result, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

    conn.execute(
        sql,
        params![
            entry.player_id,
            entry.match_id,
            entry.tournament_id,
            entry.opponent_id,
            entry.rating_before,
            entry.rating_after,
            entry.rating_change,
            entry.rd_before,
            entry.rd_after,
            entry.volatility_before,
            entry.volatility_after,
            entry.result,
            created_at
        ],
    )
    .context("Failed to insert rating history entry")?;

    Ok(())
}

/// Audit reader; the engine itself never reads history back.
pub fn list_history_for_player(
    conn: &mut DbConn,
    player_id: PlayerId,
) -> Result<Vec<RatingHistoryEntry>> {
    let sql = "SELECT player_id, match_id, tournament_id, opponent_id, rating_before, rating_after, rating_change, rd_before, rd_after, volatility_before, volatility_after, result FROM rating_history WHERE player_id = ?1 ORDER BY id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_history_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_history_row(row: &rusqlite::Row) -> rusqlite::Result<RatingHistoryEntry> {
    Ok(RatingHistoryEntry {
        player_id: row.get(0)?,
        match_id: row.get(1)?,
        tournament_id: row.get(2)?,
        opponent_id: row.get(3)?,
        rating_before: row.get(4)?,
        rating_after: row.get(5)?,
        rating_change: row.get(6)?,
        rd_before: row.get(7)?,
        rd_after: row.get(8)?,
        volatility_before: row.get(9)?,
        volatility_after: row.get(10)?,
        result: row.get(11)?,
    })
}
