//! Parameter structures for engine operations.
//!
//! Shared parameter structs usable from any transport (CLI, RPC, direct
//! library calls) without framework-specific derives. Interface layers
//! wrap these with their own argument types and convert via `From`.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    models::{PlanStatus, Priority},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new stage template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTemplate {
    /// Name of the template (required)
    pub name: String,
    /// Optional detailed description of the template
    pub description: Option<String>,
}

/// Parameters for appending a step to a template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddTemplateStep {
    /// ID of the template to append the step to
    pub template_id: u64,
    /// Name of the production stage this step materializes
    pub name: String,
    /// Optional detailed description of the stage work
    pub description: Option<String>,
    /// Expected duration of the stage in minutes
    pub expected_duration_minutes: Option<u32>,
    /// Workplace the materialized stage is assigned to by default
    pub default_workplace: Option<String>,
    /// Position (skill) required to work the materialized stage
    pub required_position: Option<String>,
    /// Whether the step is mandatory for the order to ship
    #[serde(default)]
    pub required: bool,
}

/// Parameters for listing templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTemplates {
    /// Include templates that are no longer offered for new plans
    #[serde(default)]
    pub include_inactive: bool,
}

/// Parameters for materializing a plan from a template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlanFromTemplate {
    /// ID of the template to instantiate
    pub template_id: u64,
    /// Title of the plan (required)
    pub title: String,
    /// External order reference supplied by order intake
    pub order_ref: Option<String>,
    /// Priority ('low', 'normal', 'high' or 'urgent'; defaults to normal)
    pub priority: Option<String>,
    /// When production is planned to begin (RFC3339)
    pub planned_start: Option<String>,
    /// Delivery deadline (RFC3339)
    pub due_at: Option<String>,
}

impl CreatePlanFromTemplate {
    /// Parses and validates priority and timestamps.
    pub fn validate(&self) -> Result<(Priority, Option<Timestamp>, Option<Timestamp>)> {
        let priority = match &self.priority {
            Some(s) => Priority::from_str(s).map_err(|_| {
                EngineError::invalid_input(
                    "priority",
                    format!("Invalid priority: {s}. Must be 'low', 'normal', 'high' or 'urgent'"),
                )
            })?,
            None => Priority::Normal,
        };

        let planned_start = parse_opt_timestamp("planned_start", self.planned_start.as_deref())?;
        let due_at = parse_opt_timestamp("due_at", self.due_at.as_deref())?;

        Ok((priority, planned_start, due_at))
    }
}

fn parse_opt_timestamp(field: &str, value: Option<&str>) -> Result<Option<Timestamp>> {
    value
        .map(|s| {
            s.parse::<Timestamp>()
                .map_err(|e| EngineError::invalid_input(field, format!("Invalid timestamp: {e}")))
        })
        .transpose()
}

/// Parameters for applying (or re-applying) a template to an order's plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyTemplateToPlan {
    /// External order reference the plan belongs to
    pub order_ref: String,
    /// ID of the template to apply
    pub template_id: u64,
}

/// Parameters for listing plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPlans {
    /// Whether to include archived plans
    #[serde(default)]
    pub archived: bool,
    /// Restrict to plans with this status
    pub status: Option<PlanStatus>,
    /// Restrict to the plan for this order reference
    pub order_ref: Option<String>,
}

/// Parameters for moving a stage to a new queue position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveStage {
    /// ID of the stage to move
    pub stage_id: u64,
    /// Target queue position (1-indexed; clamps to the last position)
    pub position: u32,
}

/// Parameters for a stage or task lifecycle operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transition {
    /// ID of the stage or task to operate on
    pub id: u64,
    /// Identity of the operator, recorded in the status log
    pub actor: String,
    /// Operator note; recorded on problem/cancel log entries
    pub note: Option<String>,
}

/// Parameters for binding a stage or task to a workplace, position
/// and/or worker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assign {
    /// ID of the stage or task to assign
    pub id: u64,
    /// Workplace to bind
    pub workplace: Option<String>,
    /// Position (skill) required for the work
    pub position: Option<String>,
    /// Individual worker to bind
    pub assignee: Option<String>,
}

/// Parameters for adding a task to a stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddTask {
    /// ID of the stage to add the task to
    pub stage_id: u64,
    /// Name of the task (required)
    pub name: String,
    /// Optional detailed description of the task work
    pub description: Option<String>,
    /// Amount of work, in `unit`
    pub quantity: Option<f64>,
    /// Unit for `quantity` (e.g. "sheets", "boxes")
    pub unit: Option<String>,
    /// Whether the completion policy counts this task against its stage
    #[serde(default)]
    pub required: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_plan_params_default_priority() {
        let params = CreatePlanFromTemplate {
            template_id: 1,
            title: "Order-42".to_string(),
            ..Default::default()
        };

        let (priority, planned_start, due_at) = params.validate().unwrap();
        assert_eq!(priority, Priority::Normal);
        assert_eq!(planned_start, None);
        assert_eq!(due_at, None);
    }

    #[test]
    fn test_create_plan_params_explicit_priority() {
        let params = CreatePlanFromTemplate {
            template_id: 1,
            title: "Order-42".to_string(),
            priority: Some("urgent".to_string()),
            ..Default::default()
        };

        let (priority, _, _) = params.validate().unwrap();
        assert_eq!(priority, Priority::Urgent);
    }

    #[test]
    fn test_create_plan_params_invalid_priority() {
        let params = CreatePlanFromTemplate {
            template_id: 1,
            title: "Order-42".to_string(),
            priority: Some("asap".to_string()),
            ..Default::default()
        };

        match params.validate().unwrap_err() {
            EngineError::InvalidInput { field, reason } => {
                assert_eq!(field, "priority");
                assert!(reason.contains("asap"));
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_create_plan_params_timestamps() {
        let params = CreatePlanFromTemplate {
            template_id: 1,
            title: "Order-42".to_string(),
            planned_start: Some("2026-09-01T08:00:00Z".to_string()),
            due_at: Some("not a date".to_string()),
            ..Default::default()
        };

        match params.validate().unwrap_err() {
            EngineError::InvalidInput { field, .. } => assert_eq!(field, "due_at"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
