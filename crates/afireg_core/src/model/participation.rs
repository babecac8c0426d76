//! Participation domain model and timestamp helpers.
//!
//! # Invariants
//! - Participations are immutable after creation, except deletion.
//! - `recorded_at` is epoch milliseconds taken at classification time.

use crate::model::activity::ActivityId;
use crate::model::student::StudentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Participation identifier ("folio").
pub type FolioId = i64;

/// Inclusive bounds of the folio allocation range.
pub const FOLIO_MIN: i64 = 1;
pub const FOLIO_MAX: i64 = 99_999;

/// Persisted participation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    pub folio: FolioId,
    pub matricula: StudentId,
    pub clave: ActivityId,
    /// Epoch milliseconds.
    pub recorded_at: i64,
    /// Whether this row carries the official attendance credit.
    pub official: bool,
}

/// Insert shape for a classified participation; the folio is allocated at
/// insert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewParticipation {
    pub matricula: StudentId,
    pub clave: ActivityId,
    pub recorded_at: i64,
    pub official: bool,
}

/// Two-valued display label for the official flag.
pub fn official_label(official: bool) -> &'static str {
    if official {
        "Yes"
    } else {
        "No"
    }
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Formats an epoch-millisecond timestamp as `YYYY-MM-DD HH:MM` (UTC).
///
/// Falls back to the raw number when the value is outside the representable
/// range.
pub fn format_epoch_ms(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}
