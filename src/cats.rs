//! Cat collection: a small document store kept in the `cats` table.
//!
//! Documents carry a generated text id and a JSON array of features. Name
//! based mutations act on the first cat (in insertion order) with exactly
//! that name, and return the document as stored afterwards.

use crate::executor::{delete, insert, read, update};
use crate::id::{CAT_ID_PREFIX, generate_id};
use crate::types::{Cat, DeleteOutcome, NewCat, ValidationError, merge_features, validate_name};
use chrono::Utc;
use log::{debug, error};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};

/// Cat documents bound to one connection.
pub struct CatCollection<'c> {
    conn: &'c Connection,
}

impl<'c> CatCollection<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Every cat in insertion order.
    pub fn all(&self) -> Option<Vec<Cat>> {
        read(
            self.conn,
            "SELECT id, name, age, features FROM cats ORDER BY rowid",
            [],
            row_to_cat,
        )
    }

    /// Cats whose name contains `fragment` (case-sensitive).
    pub fn find_by_name(&self, fragment: &str) -> Option<Vec<Cat>> {
        read(
            self.conn,
            "SELECT id, name, age, features FROM cats WHERE instr(name, ?) > 0 ORDER BY rowid",
            params![fragment],
            row_to_cat,
        )
    }

    /// A single cat by document id.
    pub fn by_id(&self, id: &str) -> Option<Cat> {
        read(
            self.conn,
            "SELECT id, name, age, features FROM cats WHERE id = ?",
            params![id],
            row_to_cat,
        )
        .and_then(|cats| cats.into_iter().next())
    }

    /// The first cat with exactly this name.
    pub fn first_named(&self, name: &str) -> Option<Cat> {
        read(
            self.conn,
            "SELECT id, name, age, features FROM cats WHERE name = ? ORDER BY rowid LIMIT 1",
            params![name],
            row_to_cat,
        )
        .and_then(|cats| cats.into_iter().next())
    }

    /// Validate and insert a cat, returning it as stored.
    ///
    /// `Ok(None)` means the insert itself failed (already logged).
    pub fn create(&self, cat: &NewCat) -> Result<Option<Cat>, ValidationError> {
        let cat = cat.normalized()?;
        let features = match serde_json::to_string(&cat.features) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to encode features: {}", e);
                return Ok(None);
            }
        };

        let id = generate_id(CAT_ID_PREFIX, &cat.name, Utc::now());
        let stored: Option<String> = insert(
            self.conn,
            "INSERT INTO cats (id, name, age, features) VALUES (?, ?, ?, ?) RETURNING id",
            params![id, cat.name, cat.age, features],
        );

        Ok(stored.and_then(|id| {
            debug!("Created cat {}", id);
            self.by_id(&id)
        }))
    }

    /// Set the age of the first cat named `name`.
    pub fn update_age(&self, name: &str, age: u32) -> Option<Cat> {
        let cat = self.first_named(name)?;
        update(self.conn, "UPDATE cats SET age = ? WHERE id = ?", params![age, cat.id]);
        self.by_id(&cat.id)
    }

    /// Rename the first cat named `name`.
    ///
    /// The new name is checked like a created cat's; `Ok(None)` means no cat
    /// has that name or the update failed.
    pub fn rename(&self, name: &str, new_name: &str) -> Result<Option<Cat>, ValidationError> {
        let new_name = validate_name(new_name)?;
        let Some(cat) = self.first_named(name) else {
            return Ok(None);
        };
        update(
            self.conn,
            "UPDATE cats SET name = ? WHERE id = ?",
            params![new_name, cat.id],
        );
        Ok(self.by_id(&cat.id))
    }

    /// Add features to the first cat named `name`; features it already has are skipped.
    pub fn add_features(&self, name: &str, features: &[String]) -> Option<Cat> {
        let cat = self.first_named(name)?;
        let merged = merge_features(&cat.features, features);
        let json = match serde_json::to_string(&merged) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to encode features: {}", e);
                return None;
            }
        };

        update(self.conn, "UPDATE cats SET features = ? WHERE id = ?", params![json, cat.id]);
        self.by_id(&cat.id)
    }

    /// Delete the first cat named `name`.
    pub fn delete_by_name(&self, name: &str) -> DeleteOutcome {
        delete(
            self.conn,
            "DELETE FROM cats WHERE id = (SELECT id FROM cats WHERE name = ? ORDER BY rowid LIMIT 1)",
            params![name],
        )
    }

    /// Delete every cat.
    pub fn delete_all(&self) -> DeleteOutcome {
        delete(self.conn, "DELETE FROM cats", [])
    }
}

/// Columns: id, name, age, features
fn row_to_cat(row: &Row<'_>) -> rusqlite::Result<Cat> {
    let features_json: String = row.get(3)?;
    let features: Vec<String> = serde_json::from_str(&features_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Cat {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        features,
    })
}
