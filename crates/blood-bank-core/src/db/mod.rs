//! Database layer for the blood bank record store.

mod schema;
mod donors;
mod recipients;
mod donations;
mod requests;
mod transfusions;

pub use schema::*;
pub use donors::*;

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        debug!(path = %path.as_ref().display(), "opening database");
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Parse a stored label column back into its enum.
pub(crate) fn parse_column<T>(column: &str, value: &str) -> DbResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e: T::Err| DbError::Constraint(format!("{}: {}", column, e)))
}

/// Map a UNIQUE/CHECK failure to a readable constraint error.
pub(crate) fn map_constraint(err: rusqlite::Error, message: &str) -> DbError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DbError::Constraint(message.to_string())
        }
        other => DbError::Sqlite(other),
    }
}
