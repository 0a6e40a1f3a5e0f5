//! Command-line interface definitions using clap
//!
//! This module defines the complete CLI structure using clap's derive
//! API, implementing the parameter wrapper pattern for clean separation
//! between CLI framework concerns and core domain logic.
//!
//! Each command follows the same structure: a CLI-specific argument
//! struct with clap derives, plus a `From` conversion into the core
//! parameter type. CLI concerns (help text, aliases, flag parsing) stay
//! here; the core types remain interface-agnostic.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shopfloor_core::params::*;
use shopfloor_core::PlanStatus;

/// Main command-line interface for the shopfloor planning engine
///
/// Shopfloor manages production planning for a small factory: reusable
/// stage templates, per-order plans with an ordered stage queue, and a
/// fully audited stage/task lifecycle.
#[derive(Parser)]
#[command(version, about, name = "sf")]
pub struct Cli {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/shopfloor/shopfloor.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Operator identity recorded in the status log
    #[arg(long, global = true, default_value = "cli")]
    pub actor: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the shopfloor CLI
///
/// The CLI is organized into four command categories:
/// - `template`: Reusable stage templates (define once, instantiate per order)
/// - `plan`: Per-order plans materialized from templates
/// - `stage`: Queue moves, lifecycle transitions and assignment of stages
/// - `task`: Finer subdivisions of stages
#[derive(Subcommand)]
pub enum Commands {
    /// Manage stage templates
    #[command(alias = "tpl")]
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Manage plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Manage stages within plans
    #[command(alias = "s")]
    Stage {
        #[command(subcommand)]
        command: StageCommands,
    },
    /// Manage tasks within stages
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Create a new template
    #[command(alias = "c")]
    Create(CreateTemplateArgs),
    /// Append a step to a template
    #[command(alias = "a")]
    AddStep(AddTemplateStepArgs),
    /// Show a template with its steps
    #[command(alias = "s")]
    Show(IdArg),
    /// List templates
    #[command(aliases = ["l", "ls"])]
    List(ListTemplatesArgs),
    /// Retire a template from new plans
    Deactivate(IdArg),
    /// Delete a template permanently
    #[command(aliases = ["d", "rm"])]
    Delete(IdArg),
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a plan from a template
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// Apply a template to an order's plan (destructive resync)
    Copy(CopyTemplateArgs),
    /// List all plans
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show a plan with its stage queue
    #[command(alias = "s")]
    Show(IdArg),
    /// Archive a plan
    #[command(alias = "a")]
    Archive(IdArg),
    /// Unarchive a plan
    #[command(alias = "u")]
    Unarchive(IdArg),
    /// Delete a plan permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeletePlanArgs),
}

#[derive(Subcommand)]
pub enum StageCommands {
    /// Show a stage
    #[command(alias = "s")]
    Show(IdArg),
    /// Move a stage to a new queue position
    #[command(alias = "m")]
    Move(MoveStageArgs),
    /// Assign a stage to a workplace, position and/or worker
    #[command(alias = "a")]
    Assign(AssignArgs),
    /// Start or resume a stage
    Start(IdArg),
    /// Pause an in-progress stage
    Pause(IdArg),
    /// Complete a stage
    Complete(IdArg),
    /// Flag a problem on a stage
    Problem(NoteArgs),
    /// Cancel a stage
    Cancel(NoteArgs),
    /// Show a stage's status history
    #[command(alias = "h")]
    History(IdArg),
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a stage
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// List a stage's tasks
    #[command(aliases = ["l", "ls"])]
    List(IdArg),
    /// Assign a task to a workplace, position and/or worker
    Assign(AssignArgs),
    /// Start or resume a task
    Start(IdArg),
    /// Pause an in-progress task
    Pause(IdArg),
    /// Complete a task
    Complete(IdArg),
    /// Flag a problem on a task
    Problem(NoteArgs),
    /// Cancel a task
    Cancel(NoteArgs),
    /// Show a task's status history
    #[command(alias = "h")]
    History(IdArg),
}

/// Generic argument wrapper for commands that take a single ID
#[derive(Args)]
pub struct IdArg {
    /// Unique identifier of the resource to operate on
    pub id: u64,
}

impl From<IdArg> for Id {
    fn from(val: IdArg) -> Self {
        Id { id: val.id }
    }
}

/// Lifecycle commands that accept an operator note
#[derive(Args)]
pub struct NoteArgs {
    /// Unique identifier of the resource to operate on
    pub id: u64,
    /// Operator note recorded in the status log
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Create a new template
#[derive(Args)]
pub struct CreateTemplateArgs {
    /// Name of the template
    pub name: String,
    /// Optional description providing more context about the template
    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<CreateTemplateArgs> for CreateTemplate {
    fn from(val: CreateTemplateArgs) -> Self {
        CreateTemplate {
            name: val.name,
            description: val.description,
        }
    }
}

/// Append a step to a template
#[derive(Args)]
pub struct AddTemplateStepArgs {
    /// ID of the template to append the step to
    pub template_id: u64,
    /// Name of the production stage this step materializes
    pub name: String,
    /// Optional detailed description of the stage work
    #[arg(short, long)]
    pub description: Option<String>,
    /// Expected duration of the stage in minutes
    #[arg(short, long)]
    pub expected_minutes: Option<u32>,
    /// Workplace the materialized stage is assigned to by default
    #[arg(short, long)]
    pub workplace: Option<String>,
    /// Position (skill) required to work the materialized stage
    #[arg(short, long)]
    pub position: Option<String>,
    /// Mark the step as mandatory for the order to ship
    #[arg(long)]
    pub required: bool,
}

impl From<AddTemplateStepArgs> for AddTemplateStep {
    fn from(val: AddTemplateStepArgs) -> Self {
        AddTemplateStep {
            template_id: val.template_id,
            name: val.name,
            description: val.description,
            expected_duration_minutes: val.expected_minutes,
            default_workplace: val.workplace,
            required_position: val.position,
            required: val.required,
        }
    }
}

/// List templates
#[derive(Args)]
pub struct ListTemplatesArgs {
    /// Include retired templates in the listing
    #[arg(long)]
    pub all: bool,
}

impl From<ListTemplatesArgs> for ListTemplates {
    fn from(val: ListTemplatesArgs) -> Self {
        ListTemplates {
            include_inactive: val.all,
        }
    }
}

/// Create a plan from a template
#[derive(Args)]
pub struct CreatePlanArgs {
    /// ID of the template to instantiate
    pub template_id: u64,
    /// Title of the plan
    pub title: String,
    /// External order reference supplied by order intake
    #[arg(short, long)]
    pub order_ref: Option<String>,
    /// Priority: low, normal, high or urgent
    #[arg(short, long)]
    pub priority: Option<String>,
    /// When production is planned to begin (RFC3339)
    #[arg(long)]
    pub planned_start: Option<String>,
    /// Delivery deadline (RFC3339)
    #[arg(long)]
    pub due: Option<String>,
}

impl From<CreatePlanArgs> for CreatePlanFromTemplate {
    fn from(val: CreatePlanArgs) -> Self {
        CreatePlanFromTemplate {
            template_id: val.template_id,
            title: val.title,
            order_ref: val.order_ref,
            priority: val.priority,
            planned_start: val.planned_start,
            due_at: val.due,
        }
    }
}

/// Apply a template to an order's plan
#[derive(Args)]
pub struct CopyTemplateArgs {
    /// External order reference the plan belongs to
    pub order_ref: String,
    /// ID of the template to apply
    pub template_id: u64,
}

impl From<CopyTemplateArgs> for CopyTemplateToPlan {
    fn from(val: CopyTemplateArgs) -> Self {
        CopyTemplateToPlan {
            order_ref: val.order_ref,
            template_id: val.template_id,
        }
    }
}

/// List all plans
#[derive(Args)]
pub struct ListPlansArgs {
    /// Show archived plans as well
    #[arg(long)]
    pub archived: bool,
    /// Only show plans with this status: draft, active, done or cancelled
    #[arg(short, long)]
    pub status: Option<PlanStatus>,
    /// Only show the plan for this order reference
    #[arg(short, long)]
    pub order_ref: Option<String>,
}

impl From<ListPlansArgs> for ListPlans {
    fn from(val: ListPlansArgs) -> Self {
        ListPlans {
            archived: val.archived,
            status: val.status,
            order_ref: val.order_ref,
        }
    }
}

/// Delete a plan permanently
#[derive(Args)]
pub struct DeletePlanArgs {
    /// ID of the plan to delete
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

/// Move a stage to a new queue position
#[derive(Args)]
pub struct MoveStageArgs {
    /// ID of the stage to move
    pub stage_id: u64,
    /// Target queue position (1-indexed; clamps to the last position)
    pub position: u32,
}

impl From<MoveStageArgs> for MoveStage {
    fn from(val: MoveStageArgs) -> Self {
        MoveStage {
            stage_id: val.stage_id,
            position: val.position,
        }
    }
}

/// Assign a stage or task
#[derive(Args)]
pub struct AssignArgs {
    /// ID of the stage or task to assign
    pub id: u64,
    /// Workplace to bind
    #[arg(short, long)]
    pub workplace: Option<String>,
    /// Position (skill) required for the work
    #[arg(short, long)]
    pub position: Option<String>,
    /// Individual worker to bind
    #[arg(short, long)]
    pub assignee: Option<String>,
}

impl From<AssignArgs> for Assign {
    fn from(val: AssignArgs) -> Self {
        Assign {
            id: val.id,
            workplace: val.workplace,
            position: val.position,
            assignee: val.assignee,
        }
    }
}

/// Add a task to a stage
#[derive(Args)]
pub struct AddTaskArgs {
    /// ID of the stage to add the task to
    pub stage_id: u64,
    /// Name of the task
    pub name: String,
    /// Optional detailed description of the task work
    #[arg(short, long)]
    pub description: Option<String>,
    /// Amount of work
    #[arg(short, long)]
    pub quantity: Option<f64>,
    /// Unit for the quantity (e.g. "sheets", "boxes")
    #[arg(short, long)]
    pub unit: Option<String>,
    /// Count this task against stage completion
    #[arg(long)]
    pub required: bool,
}

impl From<AddTaskArgs> for AddTask {
    fn from(val: AddTaskArgs) -> Self {
        AddTask {
            stage_id: val.stage_id,
            name: val.name,
            description: val.description,
            quantity: val.quantity,
            unit: val.unit,
            required: val.required,
        }
    }
}
