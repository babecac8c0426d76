//! Activity repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide activity persistence APIs over the `activities` table.
//! - Own the activity-side cascade delete across `participations`.
//!
//! # Invariants
//! - `create` validates the input and allocates a fresh clave.
//! - `delete_with_participations` removes dependents and the activity as
//!   one transaction, or nothing at all.

use crate::model::activity::{
    Activity, ActivityId, NewActivity, ACTIVITY_ID_MAX, ACTIVITY_ID_MIN,
};
use crate::repo::{
    allocate_id, category_to_db, parse_category, MissingRecord, RepoError, RepoResult,
};
use rusqlite::{params, Connection, OptionalExtension};

const ACTIVITY_SELECT_SQL: &str = "SELECT clave, name, category FROM activities";

/// Repository interface for activity records.
pub trait ActivityRepository {
    /// Validates and persists a new activity, returning the stored record.
    fn create(&self, activity: &NewActivity) -> RepoResult<Activity>;
    /// Gets one activity by clave.
    fn get(&self, clave: ActivityId) -> RepoResult<Option<Activity>>;
    /// Counts participations referencing this activity.
    fn dependent_count(&self, clave: ActivityId) -> RepoResult<u64>;
    /// Deletes the activity and every participation referencing it in one
    /// transaction. Returns the number of removed participations.
    fn delete_with_participations(&self, clave: ActivityId) -> RepoResult<u64>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn create(&self, activity: &NewActivity) -> RepoResult<Activity> {
        activity.validate()?;

        let clave = allocate_id(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM activities WHERE clave = ?1);",
            ACTIVITY_ID_MIN,
            ACTIVITY_ID_MAX,
            "activity",
        )?;

        self.conn.execute(
            "INSERT INTO activities (clave, name, category) VALUES (?1, ?2, ?3);",
            params![
                clave,
                activity.name.as_str(),
                category_to_db(activity.category),
            ],
        )?;

        Ok(Activity {
            clave,
            name: activity.name.clone(),
            category: activity.category,
        })
    }

    fn get(&self, clave: ActivityId) -> RepoResult<Option<Activity>> {
        let row = self
            .conn
            .query_row(
                &format!("{ACTIVITY_SELECT_SQL} WHERE clave = ?1;"),
                [clave],
                |row| {
                    Ok((
                        row.get::<_, ActivityId>("clave")?,
                        row.get::<_, String>("name")?,
                        row.get::<_, String>("category")?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((clave, name, category_text)) => {
                let category = parse_category(&category_text).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid category `{category_text}` in activities.category"
                    ))
                })?;
                Ok(Some(Activity {
                    clave,
                    name,
                    category,
                }))
            }
            None => Ok(None),
        }
    }

    fn dependent_count(&self, clave: ActivityId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM participations WHERE clave = ?1;",
            [clave],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn delete_with_participations(&self, clave: ActivityId) -> RepoResult<u64> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM activities WHERE clave = ?1);",
            [clave],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::NotFound(MissingRecord::Activity(clave)));
        }

        // unchecked: repositories share one connection with a single caller.
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM participations WHERE clave = ?1;", [clave])?;
        tx.execute("DELETE FROM activities WHERE clave = ?1;", [clave])?;
        tx.commit()?;

        Ok(removed as u64)
    }
}
