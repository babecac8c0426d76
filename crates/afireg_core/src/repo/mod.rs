//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Identifier allocation draws from the entity's fixed numeric range and
//!   retries on collision up to a bounded attempt count.

use crate::db::DbError;
use crate::model::activity::{ActivityId, Category};
use crate::model::participation::FolioId;
use crate::model::student::StudentId;
use crate::model::ValidationError;
use rand::Rng;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod activity_repo;
pub mod participation_repo;
pub mod student_repo;

/// Upper bound on collision retries during random identifier allocation.
const MAX_ID_ATTEMPTS: u32 = 32;

pub type RepoResult<T> = Result<T, RepoError>;

/// Identifies which entity a `NotFound` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRecord {
    Student(StudentId),
    Activity(ActivityId),
    Participation(FolioId),
}

impl Display for MissingRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student(matricula) => write!(f, "no student with matricula {matricula}"),
            Self::Activity(clave) => write!(f, "no activity with clave {clave}"),
            Self::Participation(folio) => write!(f, "no participation with folio {folio}"),
        }
    }
}

/// Generic repository error for registry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(MissingRecord),
    InvalidData(String),
    IdSpaceExhausted { entity: &'static str },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(record) => write!(f, "{record}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::IdSpaceExhausted { entity } => {
                write!(f, "could not allocate a free {entity} identifier")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::IdSpaceExhausted { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn category_to_db(category: Category) -> &'static str {
    match category {
        Category::Academic => "academic",
        Category::Artistic => "artistic",
        Category::Cultural => "cultural",
        Category::Sports => "sports",
        Category::SocialResponsibility => "social_responsibility",
        Category::InnovationEntrepreneurship => "innovation_entrepreneurship",
        Category::Research => "research",
        Category::Languages => "languages",
    }
}

pub(crate) fn parse_category(value: &str) -> Option<Category> {
    match value {
        "academic" => Some(Category::Academic),
        "artistic" => Some(Category::Artistic),
        "cultural" => Some(Category::Cultural),
        "sports" => Some(Category::Sports),
        "social_responsibility" => Some(Category::SocialResponsibility),
        "innovation_entrepreneurship" => Some(Category::InnovationEntrepreneurship),
        "research" => Some(Category::Research),
        "languages" => Some(Category::Languages),
        _ => None,
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn parse_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

/// Draws a random unused identifier from `[min, max]`.
///
/// `exists_sql` must be a single-parameter `SELECT EXISTS(...)` statement
/// over the entity's identifier column.
pub(crate) fn allocate_id(
    conn: &Connection,
    exists_sql: &str,
    min: i64,
    max: i64,
    entity: &'static str,
) -> RepoResult<i64> {
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = rng.gen_range(min..=max);
        let taken: i64 = conn.query_row(exists_sql, [candidate], |row| row.get(0))?;
        if taken == 0 {
            return Ok(candidate);
        }
    }
    Err(RepoError::IdSpaceExhausted { entity })
}
