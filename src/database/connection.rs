use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

pub fn create_pool(database_path: &str) -> Result<DbPool> {
    let manager = build_manager(database_path);
    build_pool(manager)
}

/// Pool over a single in-memory database, for tests and ephemeral runs.
/// Capped at one connection: each in-memory connection is its own database.
pub fn create_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory();
    r2d2::Pool::builder()
        .max_size(1)
        .build(manager)
        .context("Failed to create in-memory database pool")
}

fn build_manager(path: &str) -> SqliteConnectionManager {
    SqliteConnectionManager::file(path)
}

fn build_pool(manager: SqliteConnectionManager) -> Result<DbPool> {
    r2d2::Pool::builder()
        .build(manager)
        .context("Failed to create database connection pool")
}

pub fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get()
        .context("Failed to get database connection from pool")
}
