//! Primitive statement executor.
//!
//! Four primitives run exactly one parameterized statement each. The
//! statement handle is prepared inside the call and dropped before it
//! returns. Database errors never escape a primitive: they are logged and
//! collapse to the primitive's sentinel value.
//!
//! | primitive | transaction | on failure |
//! |-----------|-------------|------------|
//! | [`read`]  | none        | `None`     |
//! | [`insert`]| commit      | rollback, `None` |
//! | [`update`]| commit      | rollback   |
//! | [`delete`]| commit      | rollback, [`DeleteOutcome::Failed`] |

use crate::types::DeleteOutcome;
use eyre::{Context, Result};
use log::{debug, error, warn};
use rusqlite::types::FromSql;
use rusqlite::{Connection, Params, Row, Transaction};

/// Run a query and map every returned row.
///
/// `Some(vec![])` means the query matched nothing; `None` means it failed.
pub fn read<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> Option<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    match try_read(conn, sql, params, map) {
        Ok(rows) => {
            debug!("read returned {} row(s)", rows.len());
            Some(rows)
        }
        Err(e) => {
            error!("Database error: {:#}", e);
            None
        }
    }
}

/// Run an `INSERT .. RETURNING <key>` and commit.
///
/// Returns the first column of the first returned row.
pub fn insert<K, P>(conn: &Connection, sql: &str, params: P) -> Option<K>
where
    K: FromSql,
    P: Params,
{
    let result = in_transaction(conn, |tx| {
        let mut stmt = tx.prepare(sql).context("Failed to prepare insert")?;
        let key = stmt
            .query_row(params, |row| row.get::<_, K>(0))
            .context("Insert returned no key")?;
        Ok(key)
    });

    match result {
        Ok(key) => {
            debug!("insert committed");
            Some(key)
        }
        Err(e) => {
            error!("Database error: {:#}", e);
            None
        }
    }
}

/// Run a mutating statement and commit.
pub fn update<P: Params>(conn: &Connection, sql: &str, params: P) {
    let result = in_transaction(conn, |tx| {
        let mut stmt = tx.prepare(sql).context("Failed to prepare update")?;
        Ok(stmt.execute(params)?)
    });

    match result {
        Ok(changed) => debug!("update committed, {} row(s) changed", changed),
        Err(e) => error!("Database error: {:#}", e),
    }
}

/// Run a delete statement and commit.
pub fn delete<P: Params>(conn: &Connection, sql: &str, params: P) -> DeleteOutcome {
    let result = in_transaction(conn, |tx| {
        let mut stmt = tx.prepare(sql).context("Failed to prepare delete")?;
        Ok(stmt.execute(params)?)
    });

    match result {
        Ok(0) => DeleteOutcome::NotFound,
        Ok(removed) => {
            debug!("delete committed, {} row(s) removed", removed);
            DeleteOutcome::Deleted
        }
        Err(e) => {
            error!("Database error: {:#}", e);
            DeleteOutcome::Failed
        }
    }
}

fn try_read<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql).context("Failed to prepare query")?;
    let rows = stmt
        .query_map(params, map)?
        .collect::<rusqlite::Result<Vec<T>>>()
        .context("Failed to fetch rows")?;
    Ok(rows)
}

/// Commit when `op` succeeds, roll back when it fails.
fn in_transaction<T>(conn: &Connection, op: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
    let tx = conn.unchecked_transaction().context("Failed to begin transaction")?;

    match op(&tx) {
        Ok(value) => {
            tx.commit().context("Failed to commit transaction")?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
