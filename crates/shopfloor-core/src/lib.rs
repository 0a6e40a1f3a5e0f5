//! Core library for the Shopfloor production-planning engine.
//!
//! This crate provides the business logic for a small factory's shop
//! floor: reusable stage templates, plans materialized from them per
//! order, an atomically reordered stage queue, a shared stage/task
//! lifecycle with an append-only status log, and personnel-validated
//! assignments.
//!
//! # Display Architecture
//!
//! The crate implements a Display-based architecture for formatting
//! output:
//!
//! - **Domain Models** ([`models`]): Implement [`std::fmt::Display`] for
//!   direct formatting
//! - **Display Wrappers** ([`display`]): Collection wrappers with
//!   consistent empty-collection handling
//!
//! # Quick Start
//!
//! ```rust
//! use shopfloor_core::{
//!     EngineBuilder,
//!     params::{AddTemplateStep, CreatePlanFromTemplate, CreateTemplate},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = EngineBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .build()
//!     .await?;
//!
//! // Define a template once...
//! let template = engine
//!     .create_template(&CreateTemplate {
//!         name: "Box-3step".to_string(),
//!         description: None,
//!     })
//!     .await?;
//! engine
//!     .add_template_step(&AddTemplateStep {
//!         template_id: template.id,
//!         name: "Cutting".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! // ...then materialize a plan per order.
//! let plan = engine
//!     .create_plan_from_template(&CreatePlanFromTemplate {
//!         template_id: template.id,
//!         title: "Box run, 500 pcs".to_string(),
//!         order_ref: Some("ORD-2026-0042".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("Created plan: {}", plan);
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod personnel;

// Re-export commonly used types
pub use db::{CompletionPolicy, Database, Subject};
pub use display::{History, LocalDateTime, PlanSummaries, Stages, Tasks, Templates};
pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, Result};
pub use models::{
    LogEvent, Plan, PlanFilter, PlanStatus, PlanSummary, Priority, Stage, StageTemplate,
    StatusLogEntry, Task, TemplateStep, TransitionKind, WorkStatus,
};
pub use params::{
    AddTask, AddTemplateStep, Assign, CopyTemplateToPlan, CreatePlanFromTemplate, CreateTemplate,
    Id, ListPlans, ListTemplates, MoveStage, Transition,
};
pub use personnel::{OpenRoster, PersonnelDirectory, StaticRoster};
