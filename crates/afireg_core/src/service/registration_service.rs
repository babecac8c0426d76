//! Entity registration use-case service.
//!
//! # Responsibility
//! - Provide the registration entry points for students and activities.
//! - Resolve category menu indexes before persistence.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Failure paths perform no writes.

use crate::model::activity::{Activity, Category, NewActivity};
use crate::model::student::{NewStudent, Student};
use crate::model::ValidationError;
use crate::repo::activity_repo::ActivityRepository;
use crate::repo::student_repo::StudentRepository;
use crate::repo::RepoResult;
use log::info;

/// Use-case service for registering students and activities.
pub struct RegistrationService<S, A> {
    students: S,
    activities: A,
}

impl<S: StudentRepository, A: ActivityRepository> RegistrationService<S, A> {
    pub fn new(students: S, activities: A) -> Self {
        Self {
            students,
            activities,
        }
    }

    /// Registers a new student and returns the stored record with its
    /// allocated matricula.
    pub fn register_student(&self, student: &NewStudent) -> RepoResult<Student> {
        let created = self.students.create(student)?;
        info!(
            "event=register_student module=service status=ok matricula={}",
            created.matricula
        );
        Ok(created)
    }

    /// Registers a new activity under the category selected by 1-based
    /// menu index.
    ///
    /// An out-of-range index is a validation error and persists nothing.
    pub fn register_activity(
        &self,
        name: impl Into<String>,
        category_index: usize,
    ) -> RepoResult<Activity> {
        let category = Category::from_index(category_index).ok_or(
            ValidationError::UnknownCategory {
                index: category_index,
            },
        )?;
        let created = self.activities.create(&NewActivity {
            name: name.into(),
            category,
        })?;
        info!(
            "event=register_activity module=service status=ok clave={} category={}",
            created.clave,
            created.category.label()
        );
        Ok(created)
    }
}
