//! Core domain logic for the AFI participation registry.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use export::{export_to_csv, ExportError, ExportOutcome, ExportResult};
pub use logging::{default_log_level, init_logging};
pub use model::activity::{Activity, ActivityId, Category, NewActivity};
pub use model::participation::{
    format_epoch_ms, official_label, FolioId, NewParticipation, Participation,
};
pub use model::student::{NewStudent, Student, StudentId};
pub use model::ValidationError;
pub use repo::activity_repo::{ActivityRepository, SqliteActivityRepository};
pub use repo::participation_repo::{
    ExportRow, HistoryEntry, ParticipationDetails, ParticipationRepository,
    SqliteParticipationRepository,
};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use repo::{MissingRecord, RepoError, RepoResult};
pub use service::attendance_service::{AttendanceService, RecordedParticipation};
pub use service::lifecycle_service::{
    resolve_cascade, ActivityDeletionPlan, DeletionAction, DeletionDecision, DeletionOutcome,
    LifecycleService,
};
pub use service::registration_service::RegistrationService;
pub use service::report_service::ReportService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
