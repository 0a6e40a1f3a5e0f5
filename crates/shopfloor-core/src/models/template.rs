//! Template model definitions.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Reusable blueprint from which a plan's stages are generated.
///
/// Edits to a template never retroactively change plans that were
/// already materialized from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageTemplate {
    /// Unique identifier for the template
    pub id: u64,

    /// Human-readable template name (e.g. "Box-3step")
    pub name: String,

    /// Detailed multi-line description of the template
    pub description: Option<String>,

    /// Whether the template is offered for new plans
    pub active: bool,

    /// Timestamp when the template was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the template was last modified (UTC)
    pub updated_at: Timestamp,

    /// Ordered steps (lazy-loaded by default)
    #[serde(default)]
    pub steps: Vec<TemplateStep>,
}

/// One ordered step of a template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateStep {
    /// Unique identifier for the step
    pub id: u64,

    /// ID of the owning template
    pub template_id: u64,

    /// Position within the template; contiguous 1..N per template
    pub step_no: u32,

    /// Name of the production stage this step materializes
    pub name: String,

    /// Detailed description of the stage work
    pub description: Option<String>,

    /// Expected duration of the stage in minutes
    pub expected_duration_minutes: Option<u32>,

    /// Workplace the materialized stage is assigned to by default
    pub default_workplace: Option<String>,

    /// Position (skill) required to work the materialized stage
    pub required_position: Option<String>,

    /// Whether the step is mandatory for the order to ship
    pub required: bool,
}
