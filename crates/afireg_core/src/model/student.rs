//! Student domain model.
//!
//! # Responsibility
//! - Define the student record and its registration input shape.
//! - Own student field validation (name, program, semester).
//!
//! # Invariants
//! - `matricula` is unique and never reused for another student.
//! - Students are never updated after registration, only deleted.

use crate::model::{validate_name, ValidationError};
use serde::{Deserialize, Serialize};

/// Student identifier ("matricula").
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type StudentId = i64;

/// Inclusive bounds of the matricula allocation range.
pub const STUDENT_ID_MIN: i64 = 1_000_000;
pub const STUDENT_ID_MAX: i64 = 2_999_999;

/// Persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub matricula: StudentId,
    pub name: String,
    /// Degree program ("carrera").
    pub program: String,
    /// Current semester, 1 through 10.
    pub semester: u8,
}

/// Registration input for a new student; the matricula is allocated at
/// insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub program: String,
    pub semester: u8,
}

impl NewStudent {
    /// Checks all field rules for registration.
    ///
    /// # Invariants
    /// - Name is non-empty and free of numeric characters.
    /// - Program consists of letters and spaces, with at least one letter.
    /// - Semester lies in `1..=10`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_program(&self.program)?;
        validate_semester(i64::from(self.semester))?;
        Ok(())
    }
}

/// Validates a degree program name: letters and spaces only, at least one
/// letter.
pub fn validate_program(program: &str) -> Result<(), ValidationError> {
    let mut has_letter = false;
    for c in program.chars() {
        if c.is_alphabetic() {
            has_letter = true;
        } else if c != ' ' {
            return Err(ValidationError::ProgramNotAlphabetic);
        }
    }
    if !has_letter {
        return Err(ValidationError::ProgramNotAlphabetic);
    }
    Ok(())
}

/// Validates a semester number and narrows it to the persisted width.
pub fn validate_semester(value: i64) -> Result<u8, ValidationError> {
    if (1..=10).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ValidationError::SemesterOutOfRange { got: value })
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_program, validate_semester, NewStudent};
    use crate::model::ValidationError;

    #[test]
    fn validate_accepts_well_formed_student() {
        let student = NewStudent {
            name: "Ana Lopez".to_string(),
            program: "Medicina".to_string(),
            semester: 3,
        };
        assert!(student.validate().is_ok());
    }

    #[test]
    fn program_rejects_digits_symbols_and_blank() {
        assert!(validate_program("Ingenieria en Sistemas").is_ok());
        assert_eq!(
            validate_program("Medicina 2"),
            Err(ValidationError::ProgramNotAlphabetic)
        );
        assert_eq!(
            validate_program("C.S."),
            Err(ValidationError::ProgramNotAlphabetic)
        );
        assert_eq!(
            validate_program("   "),
            Err(ValidationError::ProgramNotAlphabetic)
        );
    }

    #[test]
    fn semester_bounds_are_inclusive() {
        assert_eq!(validate_semester(1), Ok(1));
        assert_eq!(validate_semester(10), Ok(10));
        assert_eq!(
            validate_semester(0),
            Err(ValidationError::SemesterOutOfRange { got: 0 })
        );
        assert_eq!(
            validate_semester(11),
            Err(ValidationError::SemesterOutOfRange { got: 11 })
        );
    }
}
