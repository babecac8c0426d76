//! Interactive menu front end for the AFI participation registry.
//!
//! # Responsibility
//! - Drive the synchronous prompt/response loop over core services.
//! - Report every operation outcome and return to the menu; no core error
//!   is fatal to the process.

mod input;

use afireg_core::db::open_db;
use afireg_core::model::student::{validate_program, validate_semester};
use afireg_core::model::validate_name;
use afireg_core::{
    core_version, default_log_level, export_to_csv, init_logging, AttendanceService, Category,
    DeletionDecision, DeletionOutcome, ExportOutcome, LifecycleService, NewStudent,
    RegistrationService, ReportService, SqliteActivityRepository, SqliteParticipationRepository,
    SqliteStudentRepository, StudentRepository,
};
use clap::Parser;
use log::info;
use rusqlite::Connection;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const EXPORT_FILE_NAME: &str = "afi_participations.csv";

#[derive(Debug, Parser)]
#[command(name = "afireg", version, about = "AFI participation registry")]
struct Args {
    /// Registry database file.
    #[arg(long, default_value = "afis.db")]
    db: PathBuf,

    /// Log directory; defaults to `logs` under the working directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fatal: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    // Logging is best-effort: a failed bootstrap must not block the registry.
    match resolve_log_dir(args) {
        Ok(log_dir) => {
            let level = args
                .log_level
                .as_deref()
                .unwrap_or_else(|| default_log_level());
            if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
                eprintln!("warning: logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }

    info!(
        "event=cli_start module=cli status=ok version={} db={}",
        core_version(),
        args.db.display()
    );

    let conn = open_db(&args.db)?;
    menu_loop(&conn, &export_path(&args.db))?;
    Ok(())
}

fn resolve_log_dir(args: &Args) -> io::Result<PathBuf> {
    match &args.log_dir {
        Some(dir) if dir.is_absolute() => Ok(dir.clone()),
        Some(dir) => Ok(std::env::current_dir()?.join(dir)),
        None => Ok(std::env::current_dir()?.join("logs")),
    }
}

fn export_path(db_path: &Path) -> PathBuf {
    db_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(EXPORT_FILE_NAME)
}

fn menu_loop(conn: &Connection, export_file: &Path) -> io::Result<()> {
    loop {
        println!();
        println!("**** AFI PARTICIPATION REGISTRY ****");
        println!("1. Register student");
        println!("2. Register activity");
        println!("3. Record participation");
        println!("4. List a student's participations");
        println!("5. Delete student");
        println!("6. Delete participation record");
        println!("7. Delete activity");
        println!("8. Export all records");
        println!("9. Exit");

        let choice = match input::prompt("Select an option (1-9): ")?.parse::<u32>() {
            Ok(choice) => choice,
            Err(_) => {
                println!("Please enter a valid number.");
                continue;
            }
        };

        match choice {
            1 => register_student(conn)?,
            2 => register_activity(conn)?,
            3 => record_participation(conn)?,
            4 => list_participations(conn)?,
            5 => delete_student(conn)?,
            6 => delete_participation(conn)?,
            7 => delete_activity(conn)?,
            8 => export_all(conn, export_file)?,
            9 => {
                println!("Goodbye.");
                return Ok(());
            }
            _ => println!("Option not available."),
        }
    }
}

fn register_student(conn: &Connection) -> io::Result<()> {
    let name = input::prompt_validated("Student name: ", validate_name)?;
    let program = input::prompt_validated("Program: ", validate_program)?;
    let semester = loop {
        let raw = input::prompt("Current semester (1-10): ")?;
        match raw.parse::<i64>() {
            Ok(value) => match validate_semester(value) {
                Ok(semester) => break semester,
                Err(err) => println!("{err}"),
            },
            Err(_) => println!("Please enter a valid number."),
        }
    };

    let service = RegistrationService::new(
        SqliteStudentRepository::new(conn),
        SqliteActivityRepository::new(conn),
    );
    match service.register_student(&NewStudent {
        name,
        program,
        semester,
    }) {
        Ok(student) => println!("Student registered. Matricula: {}", student.matricula),
        Err(err) => println!("Could not register student: {err}"),
    }
    Ok(())
}

fn register_activity(conn: &Connection) -> io::Result<()> {
    let name = input::prompt_validated("Activity name: ", validate_name)?;

    println!();
    println!("Activity categories:");
    for (number, category) in Category::ALL.iter().enumerate() {
        println!("{}. {}", number + 1, category.label());
    }
    println!();

    let Some(index) = input::prompt_id("Select the category number: ")? else {
        println!("Please enter a valid number.");
        return Ok(());
    };
    let index = usize::try_from(index).unwrap_or(0);

    let service = RegistrationService::new(
        SqliteStudentRepository::new(conn),
        SqliteActivityRepository::new(conn),
    );
    match service.register_activity(name, index) {
        Ok(activity) => println!(
            "Activity '{}' registered. Clave: {}",
            activity.name, activity.clave
        ),
        Err(err) => println!("Could not register activity: {err}"),
    }
    Ok(())
}

fn record_participation(conn: &Connection) -> io::Result<()> {
    let Some(matricula) = input::prompt_id("Student matricula: ")? else {
        println!("Invalid matricula.");
        return Ok(());
    };

    let students = SqliteStudentRepository::new(conn);
    match students.get(matricula) {
        Ok(Some(_)) => {}
        Ok(None) => {
            println!("That matricula does not exist.");
            return Ok(());
        }
        Err(err) => {
            println!("Could not look up student: {err}");
            return Ok(());
        }
    }

    let Some(clave) = input::prompt_id("Activity clave: ")? else {
        println!("Invalid clave.");
        return Ok(());
    };

    let service = AttendanceService::new(
        SqliteStudentRepository::new(conn),
        SqliteActivityRepository::new(conn),
        SqliteParticipationRepository::new(conn),
    );
    match service.record_participation(matricula, clave) {
        Ok(recorded) if recorded.official => println!(
            "Participation recorded with official attendance ({}). Folio: {}",
            recorded.category.label(),
            recorded.folio
        ),
        Ok(recorded) => println!(
            "Participation recorded WITHOUT official attendance (an official {} record already exists). Folio: {}",
            recorded.category.label(),
            recorded.folio
        ),
        Err(err) => println!("Could not record participation: {err}"),
    }
    Ok(())
}

fn list_participations(conn: &Connection) -> io::Result<()> {
    let Some(matricula) = input::prompt_id("Student matricula: ")? else {
        println!("Invalid matricula.");
        return Ok(());
    };

    let service = ReportService::new(SqliteParticipationRepository::new(conn));
    match service.student_history(matricula) {
        Ok(entries) if entries.is_empty() => println!("No records for that matricula."),
        Ok(entries) => {
            println!();
            println!("Recorded activities:");
            println!("----------------------------------------------------");
            for entry in entries {
                let status = if entry.official {
                    "Official"
                } else {
                    "Not official"
                };
                println!(
                    "{} ({}) | {} | {}",
                    entry.activity_name,
                    entry.category.label(),
                    afireg_core::format_epoch_ms(entry.recorded_at),
                    status
                );
            }
            println!("----------------------------------------------------");
        }
        Err(err) => println!("Could not list participations: {err}"),
    }
    Ok(())
}

fn delete_student(conn: &Connection) -> io::Result<()> {
    let Some(matricula) = input::prompt_id("Matricula of the student to delete: ")? else {
        println!("Invalid matricula.");
        return Ok(());
    };

    let service = lifecycle_service(conn);
    match service.delete_student(matricula) {
        Ok(removed) => println!(
            "Student deleted along with {removed} associated participation record(s)."
        ),
        Err(err) => println!("Could not delete student: {err}"),
    }
    Ok(())
}

fn delete_participation(conn: &Connection) -> io::Result<()> {
    let Some(folio) = input::prompt_id("Folio of the participation record to delete: ")? else {
        println!("Please enter a valid folio number.");
        return Ok(());
    };

    let service = lifecycle_service(conn);
    let details = match service.participation_deletion_plan(folio) {
        Ok(details) => details,
        Err(err) => {
            println!("Could not delete record: {err}");
            return Ok(());
        }
    };

    println!("Record found:");
    println!("  Student: {}", details.student_name);
    println!("  Activity: {}", details.activity_name);
    let decision = input::confirm("Delete this record? (y/n): ")?;

    match service.delete_participation(folio, decision) {
        Ok(DeletionOutcome::Deleted { .. }) => println!("Record deleted."),
        Ok(DeletionOutcome::Aborted) => println!("Operation cancelled."),
        Err(err) => println!("Could not delete record: {err}"),
    }
    Ok(())
}

fn delete_activity(conn: &Connection) -> io::Result<()> {
    let Some(clave) = input::prompt_id("Clave of the activity to delete: ")? else {
        println!("Please enter a valid clave number.");
        return Ok(());
    };

    let service = lifecycle_service(conn);
    let plan = match service.activity_deletion_plan(clave) {
        Ok(plan) => plan,
        Err(err) => {
            println!("Could not delete activity: {err}");
            return Ok(());
        }
    };

    let decision = if plan.requires_confirmation() {
        println!(
            "Activity '{}' has {} participation record(s).",
            plan.name, plan.dependents
        );
        println!("Deleting it will remove ALL of those records permanently.");
        input::confirm("Are you sure you want to delete this activity? (y/n): ")?
    } else {
        DeletionDecision::Confirmed
    };

    match service.delete_activity(clave, decision) {
        Ok(DeletionOutcome::Deleted {
            removed_participations,
        }) => println!(
            "Activity '{}' deleted along with {} participation record(s).",
            plan.name, removed_participations
        ),
        Ok(DeletionOutcome::Aborted) => println!("Operation cancelled."),
        Err(err) => println!("Could not delete activity: {err}"),
    }
    Ok(())
}

fn export_all(conn: &Connection, export_file: &Path) -> io::Result<()> {
    let service = ReportService::new(SqliteParticipationRepository::new(conn));
    let rows = match service.export_dataset() {
        Ok(rows) => rows,
        Err(err) => {
            println!("Could not export records: {err}");
            return Ok(());
        }
    };

    match export_to_csv(export_file, &rows) {
        Ok(ExportOutcome::NothingToExport) => println!("No records to export."),
        Ok(ExportOutcome::Written { rows }) => println!(
            "Exported {rows} record(s) to '{}'.",
            export_file.display()
        ),
        Err(err) => println!("Could not export records: {err}"),
    }
    Ok(())
}

fn lifecycle_service(
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
