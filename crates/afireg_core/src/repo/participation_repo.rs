//! Participation repository contract, SQLite implementation and report
//! read models.
//!
//! # Responsibility
//! - Provide participation persistence over the `participations` table.
//! - Own the joined read models consumed by listings and the export.
//! - Answer the official-count query the attendance classifier decides on.
//!
//! # Invariants
//! - Participations are insert-and-delete only; no update path exists.
//! - `student_history` returns rows in storage (insertion) order.
//! - `export_rows` orders by matricula, then recorded_at, rowid as tiebreak.

use crate::model::activity::{ActivityId, Category};
use crate::model::participation::{
    format_epoch_ms, official_label, FolioId, NewParticipation, Participation, FOLIO_MAX,
    FOLIO_MIN,
};
use crate::model::student::StudentId;
use crate::repo::{
    allocate_id, bool_to_int, category_to_db, parse_bool, parse_category, MissingRecord,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

const PARTICIPATION_SELECT_SQL: &str =
    "SELECT folio, matricula, clave, recorded_at, official FROM participations";

/// One row of a student's participation history, joined with the activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub folio: FolioId,
    pub activity_name: String,
    pub category: Category,
    /// Epoch milliseconds.
    pub recorded_at: i64,
    pub official: bool,
}

/// One row of the consolidated export, joined across all three entities.
///
/// Fields are already rendered for spreadsheet consumption: the category as
/// its display label, the timestamp truncated to minutes, the official flag
/// as Yes/No. Serialized field names become the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRow {
    pub folio: FolioId,
    pub student_id: StudentId,
    pub student: String,
    pub program: String,
    pub semester: i64,
    pub activity_id: ActivityId,
    pub activity: String,
    pub category: String,
    pub recorded_at: String,
    pub official_attendance: String,
}

/// Joined context shown before a single participation is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationDetails {
    pub folio: FolioId,
    pub student_name: String,
    pub activity_name: String,
}

/// Repository interface for participation records.
pub trait ParticipationRepository {
    /// Persists a classified participation, allocating a fresh folio.
    fn create(&self, participation: &NewParticipation) -> RepoResult<Participation>;
    /// Gets one participation by folio.
    fn get(&self, folio: FolioId) -> RepoResult<Option<Participation>>;
    /// Counts this student's official participations within one category.
    fn official_count(&self, matricula: StudentId, category: Category) -> RepoResult<u64>;
    /// Lists the student's participations joined with activity data, in
    /// storage order. An unknown matricula yields an empty list.
    fn student_history(&self, matricula: StudentId) -> RepoResult<Vec<HistoryEntry>>;
    /// Produces the consolidated export dataset.
    fn export_rows(&self) -> RepoResult<Vec<ExportRow>>;
    /// Gets the joined names shown before deleting one participation.
    fn deletion_context(&self, folio: FolioId) -> RepoResult<Option<ParticipationDetails>>;
    /// Deletes one participation by folio.
    fn delete(&self, folio: FolioId) -> RepoResult<()>;
}

/// SQLite-backed participation repository.
pub struct SqliteParticipationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParticipationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ParticipationRepository for SqliteParticipationRepository<'_> {
    fn create(&self, participation: &NewParticipation) -> RepoResult<Participation> {
        let folio = allocate_id(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM participations WHERE folio = ?1);",
            FOLIO_MIN,
            FOLIO_MAX,
            "participation",
        )?;

        self.conn.execute(
            "INSERT INTO participations (folio, matricula, clave, recorded_at, official)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                folio,
                participation.matricula,
                participation.clave,
                participation.recorded_at,
                bool_to_int(participation.official),
            ],
        )?;

        Ok(Participation {
            folio,
            matricula: participation.matricula,
            clave: participation.clave,
            recorded_at: participation.recorded_at,
            official: participation.official,
        })
    }

    fn get(&self, folio: FolioId) -> RepoResult<Option<Participation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARTICIPATION_SELECT_SQL} WHERE folio = ?1;"))?;
        let mut rows = stmt.query([folio])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_participation_row(row)?));
        }
        Ok(None)
    }

    fn official_count(&self, matricula: StudentId, category: Category) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM participations p
             JOIN activities a ON a.clave = p.clave
             WHERE p.matricula = ?1 AND a.category = ?2 AND p.official = 1;",
            params![matricula, category_to_db(category)],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn student_history(&self, matricula: StudentId) -> RepoResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.folio, a.name, a.category, p.recorded_at, p.official
             FROM participations p
             JOIN activities a ON a.clave = p.clave
             WHERE p.matricula = ?1
             ORDER BY p.rowid ASC;",
        )?;
        let mut rows = stmt.query([matricula])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            let category_text: String = row.get(2)?;
            let category = parse_category(&category_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid category `{category_text}` in activities.category"
                ))
            })?;
            entries.push(HistoryEntry {
                folio: row.get(0)?,
                activity_name: row.get(1)?,
                category,
                recorded_at: row.get(3)?,
                official: parse_bool(row.get(4)?, "participations.official")?,
            });
        }

        Ok(entries)
    }

    fn export_rows(&self) -> RepoResult<Vec<ExportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                p.folio,
                s.matricula,
                s.name,
                s.program,
                s.semester,
                a.clave,
                a.name,
                a.category,
                p.recorded_at,
                p.official
             FROM participations p
             JOIN students s ON s.matricula = p.matricula
             JOIN activities a ON a.clave = p.clave
             ORDER BY s.matricula ASC, p.recorded_at ASC, p.rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut dataset = Vec::new();

        while let Some(row) = rows.next()? {
            let category_text: String = row.get(7)?;
            let category = parse_category(&category_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid category `{category_text}` in activities.category"
                ))
            })?;
            let official = parse_bool(row.get(9)?, "participations.official")?;
            dataset.push(ExportRow {
                folio: row.get(0)?,
                student_id: row.get(1)?,
                student: row.get(2)?,
                program: row.get(3)?,
                semester: row.get(4)?,
                activity_id: row.get(5)?,
                activity: row.get(6)?,
                category: category.label().to_string(),
                recorded_at: format_epoch_ms(row.get(8)?),
                official_attendance: official_label(official).to_string(),
            });
        }

        Ok(dataset)
    }

    fn deletion_context(&self, folio: FolioId) -> RepoResult<Option<ParticipationDetails>> {
        let details = self
            .conn
            .query_row(
                "SELECT p.folio, s.name, a.name
                 FROM participations p
                 JOIN students s ON s.matricula = p.matricula
                 JOIN activities a ON a.clave = p.clave
                 WHERE p.folio = ?1;",
                [folio],
                |row| {
                    Ok(ParticipationDetails {
                        folio: row.get(0)?,
                        student_name: row.get(1)?,
                        activity_name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(details)
    }

    fn delete(&self, folio: FolioId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM participations WHERE folio = ?1;", [folio])?;
        if changed == 0 {
            return Err(RepoError::NotFound(MissingRecord::Participation(folio)));
        }
        Ok(())
    }
}

fn parse_participation_row(row: &Row<'_>) -> RepoResult<Participation> {
    Ok(Participation {
        folio: row.get("folio")?,
        matricula: row.get("matricula")?,
        clave: row.get("clave")?,
        recorded_at: row.get("recorded_at")?,
        official: parse_bool(row.get("official")?, "participations.official")?,
    })
}
