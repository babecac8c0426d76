//! Activity ("AFI") domain model.
//!
//! # Responsibility
//! - Define the activity record and the fixed category catalogue.
//! - Map menu indexes onto categories for registration.
//!
//! # Invariants
//! - The category catalogue is closed: exactly eight variants.
//! - `clave` is unique and never reused for another activity.

use crate::model::{validate_name, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Activity identifier ("clave").
pub type ActivityId = i64;

/// Inclusive bounds of the clave allocation range.
pub const ACTIVITY_ID_MIN: i64 = 100;
pub const ACTIVITY_ID_MAX: i64 = 999;

/// Fixed set of AFI categories a student can be credited in.
///
/// A student holds at most one official participation per category, so the
/// catalogue doubles as the credit axis of the attendance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Academic,
    Artistic,
    Cultural,
    Sports,
    SocialResponsibility,
    InnovationEntrepreneurship,
    Research,
    Languages,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 8] = [
        Category::Academic,
        Category::Artistic,
        Category::Cultural,
        Category::Sports,
        Category::SocialResponsibility,
        Category::InnovationEntrepreneurship,
        Category::Research,
        Category::Languages,
    ];

    /// Resolves a 1-based menu index into a category.
    pub fn from_index(index: usize) -> Option<Category> {
        if index == 0 {
            return None;
        }
        Self::ALL.get(index - 1).copied()
    }

    /// Human-readable label shown in menus, listings and exports.
    pub fn label(self) -> &'static str {
        match self {
            Category::Academic => "Academic",
            Category::Artistic => "Artistic",
            Category::Cultural => "Cultural",
            Category::Sports => "Sports",
            Category::SocialResponsibility => "Social Responsibility",
            Category::InnovationEntrepreneurship => "Innovation & Entrepreneurship",
            Category::Research => "Research",
            Category::Languages => "Languages",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Persisted activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub clave: ActivityId,
    pub name: String,
    pub category: Category,
}

/// Registration input for a new activity; the clave is allocated at insert
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub name: String,
    pub category: Category,
}

impl NewActivity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}
