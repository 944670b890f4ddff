mod error;
mod helpers;
mod migrations;
mod reconcile;
mod tables;

use rusqlite::Connection;

pub use error::{DbError, Result};

/// In-memory query session holding the registered roster and usage tables.
pub struct Db {
    conn: Connection,
}

impl Db {
    /// Opens an isolated in-memory database with the report tables created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }
}
