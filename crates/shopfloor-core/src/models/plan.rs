//! Plan model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{PlanStatus, Priority, Stage};

/// One concrete production schedule for one order, made of ordered
/// stages materialized from a template at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Template the stages were generated from, if it still exists
    pub template_id: Option<u64>,

    /// External order reference supplied by order intake
    pub order_ref: Option<String>,

    /// Title of the plan
    pub title: String,

    /// Free-form planner notes
    pub notes: Option<String>,

    /// Priority chosen at order intake
    #[serde(default)]
    pub priority: Priority,

    /// Status of the plan
    #[serde(default)]
    pub status: PlanStatus,

    /// When production is planned to begin (UTC)
    pub planned_start: Option<Timestamp>,

    /// Delivery deadline (UTC)
    pub due_at: Option<Timestamp>,

    /// Whether the plan is hidden from the default listing
    #[serde(default)]
    pub archived: bool,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,

    /// Stages ordered by queue position (lazy-loaded by default)
    #[serde(default)]
    pub stages: Vec<Stage>,
}
