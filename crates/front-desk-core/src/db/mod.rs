//! SQLite record store.

mod schema;
mod doctors;
mod lab_tests;
mod patients;
mod prescriptions;
mod store;

pub use schema::*;

use rusqlite::{params, Connection};
use std::path::Path;

use crate::ids::{format_id, EntityKind};
use crate::store::{StoreError, StoreResult};

/// Database connection wrapper. One connection, reused for every call.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        let db = Self { conn };
        db.initialize()?;
        tracing::info!(path = %path.as_ref().display(), "opened front desk database");
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> StoreResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Derive the display identifier from the row just inserted and write it back.
fn stamp_display_id(
    conn: &Connection,
    table: &str,
    id_column: &str,
    kind: EntityKind,
) -> StoreResult<String> {
    let seq = conn.last_insert_rowid();
    let seq_u64 = u64::try_from(seq)
        .map_err(|_| StoreError::Constraint(format!("Invalid surrogate key {} in {}", seq, table)))?;
    let id = format_id(kind, seq_u64);
    conn.execute(
        &format!("UPDATE {} SET {} = ?1 WHERE seq = ?2", table, id_column),
        params![id, seq],
    )?;
    Ok(id)
}

fn parse_status<T: std::str::FromStr>(table: &str, s: &str) -> StoreResult<T> {
    s.parse()
        .map_err(|_| StoreError::Constraint(format!("Unknown {} status: {}", table, s)))
}
