use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use crate::domain::models::Tournament;

pub fn insert_tournament(conn: &mut DbConn, tournament: &Tournament) -> Result<()> {
    let sql = "INSERT INTO tournaments (id, name, tournament_date) VALUES (?1, ?2, ?3)";

    conn.execute(
        sql,
        params![tournament.id, tournament.name, tournament.tournament_date],
    )
    .context("Failed to insert tournament")?;

    Ok(())
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Tournament>> {
    let sql = "SELECT id, name, tournament_date FROM tournaments WHERE id = ?1";

    conn.query_row(sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Tournament>> {
    let sql = "SELECT id, name, tournament_date FROM tournaments ORDER BY tournament_date";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        tournament_date: row.get(2)?,
    })
}
