//! Query and report use-case service.
//!
//! # Responsibility
//! - Expose the joined read views: a student's history and the
//!   consolidated export dataset.

use crate::model::student::StudentId;
use crate::repo::participation_repo::{ExportRow, HistoryEntry, ParticipationRepository};
use crate::repo::RepoResult;

/// Use-case service for listings and the consolidated export.
pub struct ReportService<P> {
    participations: P,
}

impl<P: ParticipationRepository> ReportService<P> {
    pub fn new(participations: P) -> Self {
        Self { participations }
    }

    /// Lists one student's participations in storage order.
    ///
    /// An unknown matricula is not an error; it yields an empty list.
    pub fn student_history(&self, matricula: StudentId) -> RepoResult<Vec<HistoryEntry>> {
        self.participations.student_history(matricula)
    }

    /// Produces the consolidated export dataset: one row per participation
    /// joined across students and activities, ordered by matricula then
    /// recording time. Empty when the store holds no participations.
    pub fn export_dataset(&self) -> RepoResult<Vec<ExportRow>> {
        self.participations.export_rows()
    }
}
