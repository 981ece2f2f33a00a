use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use crate::domain::models::TournamentPlacement;

pub fn insert_placement(conn: &mut DbConn, placement: &TournamentPlacement) -> Result<()> {
    let sql = "INSERT INTO tournament_placements (id, player_id, tournament_id, placement, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";

    conn.execute(
        sql,
        params![
            placement.id,
            placement.player_id,
            placement.tournament_id,
            placement.placement,
            placement.created_at
        ],
    )
    .context("Failed to insert tournament placement")?;

    Ok(())
}

/// Placements up to `max_placement`, ascending by creation time.
pub fn list_scored_chronological(
    conn: &mut DbConn,
    max_placement: i32,
) -> Result<Vec<TournamentPlacement>> {
    let sql = "SELECT id, player_id, tournament_id, placement, created_at FROM tournament_placements WHERE placement <= ?1 ORDER BY created_at ASC, id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![max_placement], parse_placement_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_tournament(
    conn: &mut DbConn,
    tournament_id: i64,
) -> Result<Vec<TournamentPlacement>> {
    let sql = "SELECT id, player_id, tournament_id, placement, created_at FROM tournament_placements WHERE tournament_id = ?1 ORDER BY placement ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_placement_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_placement_row(row: &rusqlite::Row) -> rusqlite::Result<TournamentPlacement> {
    Ok(TournamentPlacement {
        id: row.get(0)?,
        player_id: row.get(1)?,
        tournament_id: row.get(2)?,
        placement: row.get(3)?,
        created_at: row.get(4)?,
    })
}
