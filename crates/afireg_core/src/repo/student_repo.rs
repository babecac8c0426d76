//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide student persistence APIs over the `students` table.
//! - Own the student-side cascade delete across `participations`.
//!
//! # Invariants
//! - `create` validates the input and allocates a fresh matricula.
//! - `delete_with_participations` removes dependents and the student as one
//!   transaction, or nothing at all.

use crate::model::student::{
    NewStudent, Student, StudentId, STUDENT_ID_MAX, STUDENT_ID_MIN,
};
use crate::repo::{allocate_id, MissingRecord, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const STUDENT_SELECT_SQL: &str = "SELECT matricula, name, program, semester FROM students";

/// Repository interface for student records.
pub trait StudentRepository {
    /// Validates and persists a new student, returning the stored record.
    fn create(&self, student: &NewStudent) -> RepoResult<Student>;
    /// Gets one student by matricula.
    fn get(&self, matricula: StudentId) -> RepoResult<Option<Student>>;
    /// Deletes the student and every participation referencing it in one
    /// transaction. Returns the number of removed participations.
    fn delete_with_participations(&self, matricula: StudentId) -> RepoResult<u64>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create(&self, student: &NewStudent) -> RepoResult<Student> {
        student.validate()?;

        let matricula = allocate_id(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM students WHERE matricula = ?1);",
            STUDENT_ID_MIN,
            STUDENT_ID_MAX,
            "student",
        )?;

        self.conn.execute(
            "INSERT INTO students (matricula, name, program, semester)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                matricula,
                student.name.as_str(),
                student.program.as_str(),
                i64::from(student.semester),
            ],
        )?;

        Ok(Student {
            matricula,
            name: student.name.clone(),
            program: student.program.clone(),
            semester: student.semester,
        })
    }

    fn get(&self, matricula: StudentId) -> RepoResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                &format!("{STUDENT_SELECT_SQL} WHERE matricula = ?1;"),
                [matricula],
                parse_student_row,
            )
            .optional()?;
        Ok(student)
    }

    fn delete_with_participations(&self, matricula: StudentId) -> RepoResult<u64> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM students WHERE matricula = ?1);",
            [matricula],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::NotFound(MissingRecord::Student(matricula)));
        }

        // unchecked: repositories share one connection with a single caller.
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM participations WHERE matricula = ?1;",
            [matricula],
        )?;
        tx.execute("DELETE FROM students WHERE matricula = ?1;", [matricula])?;
        tx.commit()?;

        Ok(removed as u64)
    }
}

fn parse_student_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        matricula: row.get("matricula")?,
        name: row.get("name")?,
        program: row.get("program")?,
        semester: row.get("semester")?,
    })
}
