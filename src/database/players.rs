use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use crate::domain::models::{Player, PlayerId};

pub fn insert_player(conn: &mut DbConn, player: &Player) -> Result<()> {
    let sql = "INSERT INTO players (id, name, avatar_url, created_at) VALUES (?1, ?2, ?3, ?4)";

    conn.execute(
        sql,
        params![player.id, player.name, player.avatar_url, player.created_at],
    )
    .context("Failed to insert player")?;

    Ok(())
}

pub fn find_by_id(conn: &mut DbConn, id: PlayerId) -> Result<Option<Player>> {
    let sql = "SELECT id, name, avatar_url, created_at FROM players WHERE id = ?1";

    conn.query_row(sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Player>> {
    let sql = "SELECT id, name, avatar_url, created_at FROM players ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        avatar_url: row.get(2)?,
        created_at: row.get(3)?,
    })
}
