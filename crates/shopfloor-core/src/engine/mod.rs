//! High-level engine API for production planning.
//!
//! This module provides the main [`Engine`] interface of the shopfloor
//! planning system. The engine coordinates between interface layers and
//! the database, implementing the business rules for templates, plans,
//! stages and tasks.
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Engine`] instances with configuration
//! - [`template_ops`]: Stage template management (create, add steps, list, retire)
//! - [`plan_ops`]: Plan materialization and lifecycle (create from template,
//!   copy onto an order, list, archive, delete)
//! - [`stage_ops`]: Stage operations (queue moves, lifecycle transitions,
//!   assignment, history)
//! - [`task_ops`]: Task operations (add, lifecycle transitions, assignment,
//!   history)
//!
//! All operations are async; database work runs on the blocking thread
//! pool. Each call opens its own connection, so an `Engine` can be shared
//! freely across tasks.
//!
//! # Usage
//!
//! ```rust,no_run
//! use shopfloor_core::{EngineBuilder, params::CreatePlanFromTemplate};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = EngineBuilder::new()
//!     .with_database_path(Some("/custom/path/shopfloor.db"))
//!     .build()
//!     .await?;
//!
//! let plan = engine
//!     .create_plan_from_template(&CreatePlanFromTemplate {
//!         template_id: 1,
//!         title: "Box run, 500 pcs".to_string(),
//!         order_ref: Some("ORD-2026-0042".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    db::{CompletionPolicy, Database, Subject},
    error::{EngineError, Result},
    models::TransitionKind,
    personnel::PersonnelDirectory,
};

pub mod builder;
pub mod plan_ops;
pub mod stage_ops;
pub mod task_ops;
pub mod template_ops;


pub use builder::EngineBuilder;

/// How many times a lifecycle operation is retried when a concurrent
/// writer invalidates the compare-and-set before the conflict is
/// surfaced to the caller.
const TRANSITION_ATTEMPTS: u32 = 3;

/// Main engine interface for managing templates, plans, stages and tasks.
pub struct Engine {
    pub(crate) db_path: PathBuf,
    pub(crate) policy: CompletionPolicy,
    pub(crate) directory: Arc<dyn PersonnelDirectory>,
}

impl Engine {
    /// Creates a new engine with the specified configuration.
    pub(crate) fn new(
        db_path: PathBuf,
        policy: CompletionPolicy,
        directory: Arc<dyn PersonnelDirectory>,
    ) -> Self {
        Self {
            db_path,
            policy,
            directory,
        }
    }
}

/// Runs one lifecycle transition on a fresh connection, retrying a
/// bounded number of times when a concurrent writer wins the
/// compare-and-set. Runs on the blocking pool.
pub(crate) fn run_transition(
    db_path: &Path,
    subject: Subject,
    id: u64,
    kind: TransitionKind,
    actor: &str,
    note: Option<&str>,
    policy: CompletionPolicy,
) -> Result<()> {
    let mut db = Database::new(db_path)?;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match db.apply_transition(subject, id, kind, actor, note, policy) {
            Err(EngineError::ConcurrencyConflict { .. }) if attempt < TRANSITION_ATTEMPTS => {
                continue;
            }
            other => return other,
        }
    }
}
