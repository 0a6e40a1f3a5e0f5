//! Data models for the production-planning engine.
//!
//! Domain models live here; Display implementations are in
//! [`crate::display::models`] to keep data structures and presentation
//! logic apart. The stage/task lifecycle rules are pure data in
//! [`transition`], so storage code only applies outcomes that have
//! already been validated.

pub mod filters;
pub mod history;
pub mod plan;
pub mod stage;
pub mod status;
pub mod summary;
pub mod task;
pub mod template;
pub mod transition;

#[cfg(test)]
mod tests;

// Re-export all public types at the models level
pub use filters::PlanFilter;
pub use history::StatusLogEntry;
pub use plan::Plan;
pub use stage::Stage;
pub use status::{PlanStatus, Priority, WorkStatus};
pub use summary::PlanSummary;
pub use task::Task;
pub use template::{StageTemplate, TemplateStep};
pub use transition::{LogEvent, TransitionKind};
