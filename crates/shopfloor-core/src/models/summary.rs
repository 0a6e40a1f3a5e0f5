//! Plan summary model for list views.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{PlanStatus, Priority};

/// Compact plan representation backed by the `plan_summaries` views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    /// Unique identifier for the plan
    pub id: u64,

    /// External order reference supplied by order intake
    pub order_ref: Option<String>,

    /// Title of the plan
    pub title: String,

    /// Priority chosen at order intake
    pub priority: Priority,

    /// Status of the plan
    pub status: PlanStatus,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,

    /// Total number of stages in the plan
    pub total_stages: u32,

    /// Number of stages with completed status
    pub completed_stages: u32,
}
