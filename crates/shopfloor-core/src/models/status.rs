//! Status and priority enumerations for plans, stages and tasks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plan statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Plan has been sketched but not released to the floor
    Draft,

    /// Plan is released and being worked
    #[default]
    Active,

    /// All work on the plan is finished
    Done,

    /// Plan was abandoned
    Cancelled,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "active" => Ok(PlanStatus::Active),
            "done" => Ok(PlanStatus::Done),
            "cancelled" => Ok(PlanStatus::Cancelled),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Active => "active",
            PlanStatus::Done => "done",
            PlanStatus::Cancelled => "cancelled",
        }
    }
}

/// Plan priority as chosen at order intake.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

impl Priority {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

/// Type-safe enumeration of stage and task statuses.
///
/// `Completed` and `Cancelled` are terminal; no operation leaves them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// Queued, nothing has happened yet
    Waiting,

    /// Being worked on the floor
    InProgress,

    /// Work started but is on hold
    Paused,

    /// Work finished
    Completed,

    /// Flagged for attention (blocked, defect found, material missing)
    Problem,

    /// Abandoned
    Cancelled,
}

impl FromStr for WorkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waiting" => Ok(WorkStatus::Waiting),
            "in_progress" | "inprogress" => Ok(WorkStatus::InProgress),
            "paused" => Ok(WorkStatus::Paused),
            "completed" => Ok(WorkStatus::Completed),
            "problem" => Ok(WorkStatus::Problem),
            "cancelled" => Ok(WorkStatus::Cancelled),
            _ => Err(format!("Invalid work status: {s}")),
        }
    }
}

impl WorkStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Waiting => "waiting",
            WorkStatus::InProgress => "in_progress",
            WorkStatus::Paused => "paused",
            WorkStatus::Completed => "completed",
            WorkStatus::Problem => "problem",
            WorkStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkStatus::Completed | WorkStatus::Cancelled)
    }

    /// Get status with consistent icon formatting for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            WorkStatus::Waiting => "○ Waiting",
            WorkStatus::InProgress => "➤ In Progress",
            WorkStatus::Paused => "⏸ Paused",
            WorkStatus::Completed => "✓ Completed",
            WorkStatus::Problem => "⚠ Problem",
            WorkStatus::Cancelled => "✗ Cancelled",
        }
    }
}
