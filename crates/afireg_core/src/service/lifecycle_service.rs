//! Deletion lifecycle use-case service.
//!
//! # Responsibility
//! - Provide the three deletion operations with cascade semantics.
//! - Keep the confirmation decision pure and separate from any input
//!   surface: callers gather a [`DeletionDecision`], the service resolves
//!   it through [`resolve_cascade`].
//!
//! # Invariants
//! - A declined confirmation is a successful no-op, never an error.
//! - Cascades are fully applied or fully abandoned.

use crate::model::activity::ActivityId;
use crate::model::participation::FolioId;
use crate::model::student::StudentId;
use crate::repo::activity_repo::ActivityRepository;
use crate::repo::participation_repo::{ParticipationDetails, ParticipationRepository};
use crate::repo::student_repo::StudentRepository;
use crate::repo::{MissingRecord, RepoError, RepoResult};
use log::info;

/// Caller's answer to a destructive-operation confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionDecision {
    Confirmed,
    Declined,
}

/// Resolved action for a deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionAction {
    Proceed,
    Abort,
}

/// Outcome of a deletion operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// The deletion ran; `removed_participations` counts participation rows
    /// taken out (including the row itself for single-record deletion).
    Deleted { removed_participations: u64 },
    /// The caller declined; the store is untouched.
    Aborted,
}

/// Pure confirmation rule: a deletion proceeds unless it requires
/// confirmation and the caller declined.
pub fn resolve_cascade(requires_confirmation: bool, decision: DeletionDecision) -> DeletionAction {
    if requires_confirmation && decision == DeletionDecision::Declined {
        DeletionAction::Abort
    } else {
        DeletionAction::Proceed
    }
}

/// What deleting an activity would take with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDeletionPlan {
    pub clave: ActivityId,
    pub name: String,
    pub dependents: u64,
}

impl ActivityDeletionPlan {
    /// Confirmation is only required for a destructive cascade.
    pub fn requires_confirmation(&self) -> bool {
        self.dependents > 0
    }
}

/// Use-case service for the deletion operations.
pub struct LifecycleService<S, A, P> {
    students: S,
    activities: A,
    participations: P,
}

impl<S, A, P> LifecycleService<S, A, P>
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

    /// Deletes a student and all of their participations as one unit.
    ///
    /// Returns the number of removed participations.
    pub fn delete_student(&self, matricula: StudentId) -> RepoResult<u64> {
        let removed = self.students.delete_with_participations(matricula)?;
        info!(
            "event=delete_student module=service status=ok matricula={} removed_participations={}",
            matricula, removed
        );
        Ok(removed)
    }

    /// Describes what deleting the activity would remove.
    ///
    /// # Errors
    /// - `NotFound` when the clave does not resolve.
    pub fn activity_deletion_plan(&self, clave: ActivityId) -> RepoResult<ActivityDeletionPlan> {
        let activity = self
            .activities
            .get(clave)?
            .ok_or(RepoError::NotFound(MissingRecord::Activity(clave)))?;
        let dependents = self.activities.dependent_count(clave)?;
        Ok(ActivityDeletionPlan {
            clave,
            name: activity.name,
            dependents,
        })
    }

    /// Deletes an activity, cascading over its participations.
    ///
    /// When dependents exist the caller's decision gates the cascade;
    /// declining aborts with the store untouched.
    pub fn delete_activity(
        &self,
        clave: ActivityId,
        decision: DeletionDecision,
    ) -> RepoResult<DeletionOutcome> {
        let plan = self.activity_deletion_plan(clave)?;

        match resolve_cascade(plan.requires_confirmation(), decision) {
            DeletionAction::Abort => {
                info!(
                    "event=delete_activity module=service status=aborted clave={} dependents={}",
                    clave, plan.dependents
                );
                Ok(DeletionOutcome::Aborted)
            }
            DeletionAction::Proceed => {
                let removed = self.activities.delete_with_participations(clave)?;
                info!(
                    "event=delete_activity module=service status=ok clave={} removed_participations={}",
                    clave, removed
                );
                Ok(DeletionOutcome::Deleted {
                    removed_participations: removed,
                })
            }
        }
    }

    /// Gets the joined names shown to the caller before confirming a
    /// single-participation deletion.
    ///
    /// # Errors
    /// - `NotFound` when the folio does not resolve.
    pub fn participation_deletion_plan(
        &self,
        folio: FolioId,
    ) -> RepoResult<ParticipationDetails> {
        self.participations
            .deletion_context(folio)?
            .ok_or(RepoError::NotFound(MissingRecord::Participation(folio)))
    }

    /// Deletes a single participation record; always gated on the caller's
    /// decision.
    pub fn delete_participation(
        &self,
        folio: FolioId,
        decision: DeletionDecision,
    ) -> RepoResult<DeletionOutcome> {
        if self.participations.deletion_context(folio)?.is_none() {
            return Err(RepoError::NotFound(MissingRecord::Participation(folio)));
        }

        match resolve_cascade(true, decision) {
            DeletionAction::Abort => {
                info!(
                    "event=delete_participation module=service status=aborted folio={}",
                    folio
                );
                Ok(DeletionOutcome::Aborted)
            }
            DeletionAction::Proceed => {
                self.participations.delete(folio)?;
                info!(
                    "event=delete_participation module=service status=ok folio={}",
                    folio
                );
                Ok(DeletionOutcome::Deleted {
                    removed_participations: 1,
                })
            }
        }
    }
}
