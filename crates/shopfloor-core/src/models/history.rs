//! Status log model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{LogEvent, WorkStatus};

/// One immutable audit record of a stage or task status change.
///
/// Rows are append-only; replaying a subject's entries in insertion
/// order reconstructs its full status history, and the subject's
/// current status equals the `after` of the last entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusLogEntry {
    /// Unique identifier for the log entry
    pub id: u64,

    /// ID of the stage or task the entry belongs to
    pub subject_id: u64,

    /// What happened (started, paused, completed, ...)
    pub event: LogEvent,

    /// Status before the transition
    pub before_status: WorkStatus,

    /// Status after the transition
    pub after_status: WorkStatus,

    /// Identity of the operator who triggered the transition
    pub actor: String,

    /// Operator note, recorded for problem/cancel transitions
    pub note: Option<String>,

    /// Server-assigned timestamp of the transition (UTC)
    pub logged_at: Timestamp,
}
