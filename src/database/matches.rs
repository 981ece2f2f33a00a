use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use crate::domain::models::MatchRecord;

pub fn insert_match(conn: &mut DbConn, record: &MatchRecord) -> Result<()> {
    let sql = "INSERT INTO matches (id, player1_id, player2_id, winner_id, played_at, note) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

    conn.execute(
        sql,
        params![
            record.id,
            record.player1_id,
            record.player2_id,
            record.winner_id,
            record.played_at,
            record.note
        ],
    )
    .context("Failed to insert match")?;

    Ok(())
}

/// All matches, ascending by play time (id breaks exact-timestamp ties).
pub fn list_chronological(conn: &mut DbConn) -> Result<Vec<MatchRecord>> {
    let sql = "SELECT id, player1_id, player2_id, winner_id, played_at, note FROM matches ORDER BY played_at ASC, id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRecord> {
    Ok(MatchRecord {
        id: row.get(0)?,
        player1_id: row.get(1)?,
        player2_id: row.get(2)?,
        winner_id: row.get(3)?,
        played_at: row.get(4)?,
        note: row.get(5)?,
    })
}
