//! The stage/task lifecycle state machine.
//!
//! The same bounded lifecycle applies to stages and tasks:
//!
//! ```text
//! waiting ──start──▶ in_progress ──complete──▶ completed
//!                      │    ▲
//!                   pause  start
//!                      ▼    │
//!                     paused ──complete──▶ completed
//! ```
//!
//! `problem` and `cancelled` are reachable from any non-terminal state;
//! a `problem` subject can only be re-flagged or cancelled. `completed`
//! and `cancelled` are terminal. Validation lives here as pure data so
//! storage code only has to apply the outcome.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::WorkStatus;

/// A lifecycle operation requested on a stage or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Start,
    Pause,
    Complete,
    FlagProblem,
    Cancel,
}

impl TransitionKind {
    /// All transition kinds, for exhaustive table checks.
    pub const ALL: [TransitionKind; 5] = [
        TransitionKind::Start,
        TransitionKind::Pause,
        TransitionKind::Complete,
        TransitionKind::FlagProblem,
        TransitionKind::Cancel,
    ];

    /// Operation name used in errors and CLI output.
    pub fn verb(&self) -> &'static str {
        match self {
            TransitionKind::Start => "start",
            TransitionKind::Pause => "pause",
            TransitionKind::Complete => "complete",
            TransitionKind::FlagProblem => "flag a problem on",
            TransitionKind::Cancel => "cancel",
        }
    }

    /// Whether this operation is allowed from the given status.
    pub fn allowed_from(&self, from: WorkStatus) -> bool {
        match self {
            TransitionKind::Start => matches!(from, WorkStatus::Waiting | WorkStatus::Paused),
            TransitionKind::Pause => matches!(from, WorkStatus::InProgress),
            TransitionKind::Complete => {
                matches!(from, WorkStatus::InProgress | WorkStatus::Paused)
            }
            TransitionKind::FlagProblem | TransitionKind::Cancel => !from.is_terminal(),
        }
    }

    /// The status this operation lands in.
    pub fn target(&self) -> WorkStatus {
        match self {
            TransitionKind::Start => WorkStatus::InProgress,
            TransitionKind::Pause => WorkStatus::Paused,
            TransitionKind::Complete => WorkStatus::Completed,
            TransitionKind::FlagProblem => WorkStatus::Problem,
            TransitionKind::Cancel => WorkStatus::Cancelled,
        }
    }

    /// The audit event recorded for this operation from the given status.
    pub fn event(&self, from: WorkStatus) -> LogEvent {
        match self {
            TransitionKind::Start if from == WorkStatus::Waiting => LogEvent::Started,
            TransitionKind::Start => LogEvent::Resumed,
            TransitionKind::Pause => LogEvent::Paused,
            TransitionKind::Complete => LogEvent::Completed,
            TransitionKind::FlagProblem => LogEvent::Problem,
            TransitionKind::Cancel => LogEvent::Cancelled,
        }
    }
}

/// Audit event names written to the status log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogEvent {
    Started,
    Resumed,
    Paused,
    Completed,
    Problem,
    Cancelled,
}

impl LogEvent {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogEvent::Started => "started",
            LogEvent::Resumed => "resumed",
            LogEvent::Paused => "paused",
            LogEvent::Completed => "completed",
            LogEvent::Problem => "problem",
            LogEvent::Cancelled => "cancelled",
        }
    }
}

impl FromStr for LogEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "started" => Ok(LogEvent::Started),
            "resumed" => Ok(LogEvent::Resumed),
            "paused" => Ok(LogEvent::Paused),
            "completed" => Ok(LogEvent::Completed),
            "problem" => Ok(LogEvent::Problem),
            "cancelled" => Ok(LogEvent::Cancelled),
            _ => Err(format!("Invalid log event: {s}")),
        }
    }
}
