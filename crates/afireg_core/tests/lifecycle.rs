use afireg_core::db::open_db_in_memory;
use afireg_core::{
    Activity, ActivityRepository, AttendanceService, Category, DeletionDecision, DeletionOutcome,
    LifecycleService, MissingRecord, NewActivity, NewStudent, ParticipationRepository, RepoError,
    ReportService, SqliteActivityRepository, SqliteParticipationRepository,
    SqliteStudentRepository, Student, StudentRepository,
};
use rusqlite::Connection;

#[test]
fn delete_student_cascades_participations() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let coro = seed_activity(&conn, "Coro", Category::Cultural);
    record(&conn, ana.matricula, torneo.clave);
    record(&conn, ana.matricula, coro.clave);

    let removed = lifecycle(&conn).delete_student(ana.matricula).unwrap();
    assert_eq!(removed, 2);

    let history = ReportService::new(SqliteParticipationRepository::new(&conn))
        .student_history(ana.matricula)
        .unwrap();
    assert!(history.is_empty());

    let err = attendance(&conn)
        .record_participation(ana.matricula, torneo.clave)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound(MissingRecord::Student(_))
    ));
}

#[test]
fn delete_student_not_found_on_repeat_invocation() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);

    lifecycle(&conn).delete_student(ana.matricula).unwrap();

    let err = lifecycle(&conn).delete_student(ana.matricula).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound(MissingRecord::Student(_))
    ));
}

#[test]
fn delete_activity_without_dependents_needs_no_confirmation() {
    let conn = open_db_in_memory().unwrap();
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let service = lifecycle(&conn);

    let plan = service.activity_deletion_plan(torneo.clave).unwrap();
    assert_eq!(plan.dependents, 0);
    assert!(!plan.requires_confirmation());

    // The decision is irrelevant when no cascade is involved.
    let outcome = service
        .delete_activity(torneo.clave, DeletionDecision::Declined)
        .unwrap();
    assert_eq!(
        outcome,
        DeletionOutcome::Deleted {
            removed_participations: 0
        }
    );
    assert!(SqliteActivityRepository::new(&conn)
        .get(torneo.clave)
        .unwrap()
        .is_none());
}

#[test]
fn declined_activity_cascade_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    record(&conn, ana.matricula, torneo.clave);
    let service = lifecycle(&conn);

    let plan = service.activity_deletion_plan(torneo.clave).unwrap();
    assert_eq!(plan.dependents, 1);
    assert!(plan.requires_confirmation());

    let outcome = service
        .delete_activity(torneo.clave, DeletionDecision::Declined)
        .unwrap();
    assert_eq!(outcome, DeletionOutcome::Aborted);

    let activities = SqliteActivityRepository::new(&conn);
    assert!(activities.get(torneo.clave).unwrap().is_some());
    assert_eq!(activities.dependent_count(torneo.clave).unwrap(), 1);
}

#[test]
fn confirmed_activity_cascade_removes_only_its_dependents() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let coro = seed_activity(&conn, "Coro", Category::Cultural);
    record(&conn, ana.matricula, torneo.clave);
    record(&conn, ana.matricula, torneo.clave);
    let kept = record(&conn, ana.matricula, coro.clave);

    let outcome = lifecycle(&conn)
        .delete_activity(torneo.clave, DeletionDecision::Confirmed)
        .unwrap();
    assert_eq!(
        outcome,
        DeletionOutcome::Deleted {
            removed_participations: 2
        }
    );

    assert!(SqliteActivityRepository::new(&conn)
        .get(torneo.clave)
        .unwrap()
        .is_none());
    let participations = SqliteParticipationRepository::new(&conn);
    assert!(participations.get(kept).unwrap().is_some());
    assert_eq!(participation_count(&conn), 1);
}

#[test]
fn delete_activity_not_found_when_absent() {
    let conn = open_db_in_memory().unwrap();

    let err = lifecycle(&conn)
        .delete_activity(404, DeletionDecision::Confirmed)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound(MissingRecord::Activity(404))
    ));
}

#[test]
fn participation_deletion_plan_carries_the_joined_names() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let folio = record(&conn, ana.matricula, torneo.clave);

    let details = lifecycle(&conn).participation_deletion_plan(folio).unwrap();
    assert_eq!(details.folio, folio);
    assert_eq!(details.student_name, "Ana Lopez");
    assert_eq!(details.activity_name, "Torneo");
}

#[test]
fn declined_participation_deletion_keeps_the_row() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let folio = record(&conn, ana.matricula, torneo.clave);

    let outcome = lifecycle(&conn)
        .delete_participation(folio, DeletionDecision::Declined)
        .unwrap();
    assert_eq!(outcome, DeletionOutcome::Aborted);
    assert!(SqliteParticipationRepository::new(&conn)
        .get(folio)
        .unwrap()
        .is_some());
}

#[test]
fn confirmed_participation_deletion_removes_one_row() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let folio = record(&conn, ana.matricula, torneo.clave);

    let outcome = lifecycle(&conn)
        .delete_participation(folio, DeletionDecision::Confirmed)
        .unwrap();
    assert_eq!(
        outcome,
        DeletionOutcome::Deleted {
            removed_participations: 1
        }
    );

    let err = lifecycle(&conn)
        .delete_participation(folio, DeletionDecision::Confirmed)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound(MissingRecord::Participation(_))
    ));
}

fn lifecycle(
    conn: &Connection,
) -> LifecycleService<
    SqliteStudentRepository<'_>,
    SqliteActivityRepository<'_>,
    SqliteParticipationRepository<'_>,
> {
    LifecycleService::new(
        SqliteStudentRepository::new(conn),
        SqliteActivityRepository::new(conn),
        SqliteParticipationRepository::new(conn),
    )
}

fn attendance(
    conn: &Connection,
) -> AttendanceService<
    SqliteStudentRepository<'_>,
    SqliteActivityRepository<'_>,
    SqliteParticipationRepository<'_>,
> {
    AttendanceService::new(
        SqliteStudentRepository::new(conn),
        SqliteActivityRepository::new(conn),
        SqliteParticipationRepository::new(conn),
    )
}

fn seed_student(conn: &Connection, name: &str, program: &str, semester: u8) -> Student {
    SqliteStudentRepository::new(conn)
        .create(&NewStudent {
            name: name.to_string(),
            program: program.to_string(),
            semester,
        })
        .unwrap()
}

fn seed_activity(conn: &Connection, name: &str, category: Category) -> Activity {
    SqliteActivityRepository::new(conn)
        .create(&NewActivity {
            name: name.to_string(),
            category,
        })
        .unwrap()
}

fn record(conn: &Connection, matricula: i64, clave: i64) -> i64 {
    attendance(conn)
        .record_participation(matricula, clave)
        .unwrap()
        .folio
}

fn participation_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM participations;", [], |row| row.get(0))
        .unwrap()
}
