//! Schema for the task database and the cat collection.

use crate::types::TaskStatus;
use eyre::{Context, Result};
use log::info;
use rusqlite::{Connection, params};

/// Relational tables: users, the status lookup, and tasks.
const TASKS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        fullname TEXT NOT NULL CHECK (length(fullname) <= 100),
        email TEXT NOT NULL UNIQUE CHECK (length(email) <= 100)
    );

    CREATE TABLE IF NOT EXISTS status (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE CHECK (length(name) <= 50)
    );

    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL CHECK (length(title) <= 100),
        description TEXT,
        status_id INTEGER NOT NULL REFERENCES status(id),
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status_id);
    CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id);
"#;

/// Document-style collection; `features` holds a JSON array of strings.
const CATS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS cats (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        age INTEGER NOT NULL CHECK (age >= 0),
        features TEXT NOT NULL DEFAULT '[]'
    );
    CREATE INDEX IF NOT EXISTS idx_cats_name ON cats(name);
"#;

/// Create every table that does not exist yet and seed the status lookup.
///
/// Safe to run against an initialized database.
pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(TASKS_SCHEMA)
        .context("Failed to initialize task schema")?;
    conn.execute_batch(CATS_SCHEMA)
        .context("Failed to initialize cat schema")?;
    seed_statuses(conn)?;

    info!("Schema initialized");
    Ok(())
}

/// Drop every table and create the schema from scratch.
pub fn reset(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS tasks;
        DROP TABLE IF EXISTS users;
        DROP TABLE IF EXISTS status;
        DROP TABLE IF EXISTS cats;
        "#,
    )
    .context("Failed to drop tables")?;

    info!("Schema dropped");
    init(conn)
}

/// Insert the closed status set in seed order, skipping names already present.
fn seed_statuses(conn: &Connection) -> Result<()> {
    for status in TaskStatus::ALL {
        conn.execute(
            "INSERT OR IGNORE INTO status (name) VALUES (?)",
            params![status.as_str()],
        )
        .with_context(|| format!("Failed to seed status '{}'", status))?;
    }
    Ok(())
}
