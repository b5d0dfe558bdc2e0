//! Connection provider.
//!
//! [`Database`] owns the single SQLite connection used by the catalog and the
//! cat collection. The caller decides when it is opened and closed.

use crate::catalog::Catalog;
use crate::cats::CatCollection;
use crate::schema;
use eyre::{Context, Result};
use log::info;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-connection settings every statement in the crate relies on:
/// cascade deletes need foreign keys, and email matching is case-sensitive.
const CONNECTION_PRAGMAS: &str = r#"
    PRAGMA foreign_keys = ON;
    PRAGMA case_sensitive_like = ON;
"#;

/// An open database handle.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (creating if needed) the database file and initialize the schema.
    pub fn init(path: &Path) -> Result<Self> {
        let db = Self::open(path)?;
        schema::init(&db.conn)?;
        Ok(db)
    }

    /// Open the database file without touching the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite database at {}", path.display()))?;
        configure(&conn)?;

        info!("Opened database at {}", path.display());
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database with the schema initialized.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        configure(&conn)?;
        schema::init(&conn)?;

        Ok(Self { conn, path: None })
    }

    /// The live connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Query catalog bound to this connection.
    pub fn catalog(&self) -> Catalog<'_> {
        Catalog::new(&self.conn)
    }

    /// Cat collection bound to this connection.
    pub fn cats(&self) -> CatCollection<'_> {
        CatCollection::new(&self.conn)
    }

    /// Drop all data and recreate the schema.
    pub fn reset(&self) -> Result<()> {
        schema::reset(&self.conn)
    }

    /// Close the connection, reporting any error SQLite raises while closing.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")?;
        info!("Database closed");
        Ok(())
    }
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(CONNECTION_PRAGMAS)
        .context("Failed to configure connection")
}
