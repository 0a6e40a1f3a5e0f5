//! Task model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::WorkStatus;

/// An optional finer subdivision of a stage. A stage with zero tasks
/// is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: u64,

    /// ID of the owning stage
    pub stage_id: u64,

    /// Name of the task
    pub name: String,

    /// Detailed description of the task work
    pub description: Option<String>,

    /// Current lifecycle status (same lifecycle as stages)
    pub status: WorkStatus,

    /// Amount of work, in `unit`
    pub quantity: Option<f64>,

    /// Unit for `quantity` (e.g. "sheets", "boxes")
    pub unit: Option<String>,

    /// Whether the completion policy counts this task against its stage
    #[serde(default)]
    pub required: bool,

    /// Workplace the task is assigned to
    pub workplace: Option<String>,

    /// Position (skill) required to work the task
    pub required_position: Option<String>,

    /// Individual worker bound to the task
    pub assignee: Option<String>,

    /// Stamped on the first waiting → in_progress transition (UTC)
    pub started_at: Option<Timestamp>,

    /// Stamped on completion (UTC)
    pub finished_at: Option<Timestamp>,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the task was last updated (UTC)
    pub updated_at: Timestamp,
}
