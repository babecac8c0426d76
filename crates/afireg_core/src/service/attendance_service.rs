//! Attendance classification use-case service.
//!
//! # Responsibility
//! - Decide, at insertion time, whether a participation carries the
//!   official attendance credit.
//!
//! # Invariants
//! - A student holds at most one official participation per category among
//!   currently-existing records; the first recording in a category wins.
//! - The decision is monotonic: recording never revokes an earlier official
//!   flag, and deleting records never re-flags surviving ones.
//! - Both referenced entities must exist before anything is written.
//!
//! # Caveats
//! - The read-then-write sequence assumes the registry's single synchronous
//!   caller; concurrent callers would need per-(student, category) locking.

use crate::model::activity::{ActivityId, Category};
use crate::model::participation::{now_epoch_ms, FolioId, NewParticipation};
use crate::model::student::StudentId;
use crate::repo::activity_repo::ActivityRepository;
use crate::repo::participation_repo::ParticipationRepository;
use crate::repo::student_repo::StudentRepository;
use crate::repo::{MissingRecord, RepoError, RepoResult};
use log::info;

/// Result of classifying and persisting one participation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedParticipation {
    pub folio: FolioId,
    pub official: bool,
    /// Category the decision was made in, echoed back to the caller.
    pub category: Category,
}

/// Use-case service for recording classified participations.
pub struct AttendanceService<S, A, P> {
    students: S,
    activities: A,
    participations: P,
}

impl<S, A, P> AttendanceService<S, A, P>
where
    S: StudentRepository,
    A: ActivityRepository,
    P: ParticipationRepository,
{
    pub fn new(students: S, activities: A, participations: P) -> Self {
        Self {
            students,
            activities,
            participations,
        }
    }

    /// Records a participation for `matricula` in the activity `clave`.
    ///
    /// The participation is official iff the student holds no official
    /// record in the activity's category yet. Non-official recordings are
    /// still persisted.
    ///
    /// # Errors
    /// - `NotFound` when either identifier does not resolve; nothing is
    ///   written in that case.
    pub fn record_participation(
        &self,
        matricula: StudentId,
        clave: ActivityId,
    ) -> RepoResult<RecordedParticipation> {
        if self.students.get(matricula)?.is_none() {
            return Err(RepoError::NotFound(MissingRecord::Student(matricula)));
        }

        let activity = self
            .activities
            .get(clave)?
            .ok_or(RepoError::NotFound(MissingRecord::Activity(clave)))?;
        let category = activity.category;

        let official = self.participations.official_count(matricula, category)? == 0;

        let created = self.participations.create(&NewParticipation {
            matricula,
            clave,
            recorded_at: now_epoch_ms(),
            official,
        })?;

        info!(
            "event=record_participation module=service status=ok folio={} matricula={} clave={} category={} official={}",
            created.folio,
            matricula,
            clave,
            category.label(),
            created.official
        );

        Ok(RecordedParticipation {
            folio: created.folio,
            official: created.official,
            category,
        })
    }
}
