//! Stage model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Task, WorkStatus};

/// One step of a plan's execution (e.g. "Cutting"), with its own
/// status and live queue position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stage {
    /// Unique identifier for the stage
    pub id: u64,

    /// ID of the owning plan
    pub plan_id: u64,

    /// Originating template step; nulled if that step is deleted
    pub template_step_id: Option<u64>,

    /// Step number copied from the template at creation; informational
    pub step_no: u32,

    /// Name of the stage
    pub name: String,

    /// Detailed description of the stage work
    pub description: Option<String>,

    /// Current lifecycle status
    pub status: WorkStatus,

    /// Live execution position within the plan's queue (1-indexed).
    /// Within one plan these values are a dense permutation of 1..N.
    pub order_in_queue: u32,

    /// Workplace the stage is assigned to
    pub workplace: Option<String>,

    /// Position (skill) required to work the stage
    pub required_position: Option<String>,

    /// Individual worker bound to the stage
    pub assignee: Option<String>,

    /// Stamped on the first waiting → in_progress transition (UTC)
    pub started_at: Option<Timestamp>,

    /// Stamped on completion (UTC)
    pub finished_at: Option<Timestamp>,

    /// Whole seconds between started_at and finished_at
    pub actual_duration_secs: Option<i64>,

    /// Free-form operator notes
    pub notes: Option<String>,

    /// Timestamp when the stage was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the stage was last updated (UTC)
    pub updated_at: Timestamp,

    /// Optional finer subdivisions (lazy-loaded by default)
    #[serde(default)]
    pub tasks: Vec<Task>,
}
