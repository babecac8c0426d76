use afireg_core::db::open_db_in_memory;
use afireg_core::model::participation::{FOLIO_MAX, FOLIO_MIN};
use afireg_core::{
    Activity, ActivityRepository, AttendanceService, Category, DeletionDecision, LifecycleService,
    MissingRecord, NewActivity, NewStudent, ParticipationRepository, RepoError,
    SqliteActivityRepository, SqliteParticipationRepository, SqliteStudentRepository, Student,
    StudentRepository,
};
use rusqlite::Connection;

#[test]
fn first_participation_in_a_category_is_official_later_ones_are_not() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let maraton = seed_activity(&conn, "Maraton", Category::Sports);
    let service = attendance(&conn);

    let first = service
        .record_participation(ana.matricula, torneo.clave)
        .unwrap();
    assert!(first.official);
    assert_eq!(first.category, Category::Sports);
    assert!((FOLIO_MIN..=FOLIO_MAX).contains(&first.folio));

    let second = service
        .record_participation(ana.matricula, maraton.clave)
        .unwrap();
    assert!(!second.official);

    // Repeating the same activity does not reopen the credit either.
    let third = service
        .record_participation(ana.matricula, torneo.clave)
        .unwrap();
    assert!(!third.official);
}

#[test]
fn each_category_grants_exactly_one_official_credit_when_interleaved() {
    let conn = open_db_in_memory().unwrap();
    let student = seed_student(&conn, "Luis Torres", "Derecho", 5);
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let coro = seed_activity(&conn, "Coro", Category::Cultural);
    let maraton = seed_activity(&conn, "Maraton", Category::Sports);
    let danza = seed_activity(&conn, "Danza", Category::Cultural);
    let service = attendance(&conn);

    let flags: Vec<bool> = [torneo.clave, coro.clave, maraton.clave, danza.clave]
        .iter()
        .map(|clave| {
            service
                .record_participation(student.matricula, *clave)
                .unwrap()
                .official
        })
        .collect();

    assert_eq!(flags, vec![true, true, false, false]);
}

#[test]
fn official_credit_is_tracked_per_student() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);
    let luis = seed_student(&conn, "Luis Torres", "Derecho", 5);
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let service = attendance(&conn);

    assert!(
        service
            .record_participation(ana.matricula, torneo.clave)
            .unwrap()
            .official
    );
    assert!(
        service
            .record_participation(luis.matricula, torneo.clave)
            .unwrap()
            .official
    );
}

#[test]
fn unknown_student_fails_not_found_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let service = attendance(&conn);

    let err = service
        .record_participation(1_234_567, torneo.clave)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound(MissingRecord::Student(1_234_567))
    ));
    assert_eq!(participation_count(&conn), 0);
}

#[test]
fn unknown_activity_fails_not_found_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);
    let service = attendance(&conn);

    let err = service.record_participation(ana.matricula, 555).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound(MissingRecord::Activity(555))
    ));
    assert_eq!(participation_count(&conn), 0);
}

#[test]
fn deleting_the_official_record_never_promotes_surviving_ones() {
    let conn = open_db_in_memory().unwrap();
    let ana = seed_student(&conn, "Ana Lopez", "Medicina", 3);
    let torneo = seed_activity(&conn, "Torneo", Category::Sports);
    let maraton = seed_activity(&conn, "Maraton", Category::Sports);
    let service = attendance(&conn);

    let official = service
        .record_participation(ana.matricula, torneo.clave)
        .unwrap();
    let shadowed = service
        .record_participation(ana.matricula, maraton.clave)
        .unwrap();
    assert!(official.official);
    assert!(!shadowed.official);

    let lifecycle = LifecycleService::new(
        SqliteStudentRepository::new(&conn),
        SqliteActivityRepository::new(&conn),
        SqliteParticipationRepository::new(&conn),
    );
    lifecycle
        .delete_participation(official.folio, DeletionDecision::Confirmed)
        .unwrap();

    // The surviving record keeps its non-official flag.
    let survivor = SqliteParticipationRepository::new(&conn)
        .get(shadowed.folio)
        .unwrap()
        .unwrap();
    assert!(!survivor.official);

    // A fresh recording sees no official record left and takes the credit.
    let fresh = service
        .record_participation(ana.matricula, torneo.clave)
        .unwrap();
    assert!(fresh.official);
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

fn participation_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM participations;", [], |row| row.get(0))
        .unwrap()
}
