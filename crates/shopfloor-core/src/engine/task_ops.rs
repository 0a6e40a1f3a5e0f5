//! Task operations for the Engine.

use tokio::task;

use super::{run_transition, Engine};
use crate::{
    db::{Database, Subject},
    error::{EngineError, Result},
    models::{Task, TransitionKind},
    params::{AddTask, Assign, Id, Transition},
};

impl Engine {
    /// Adds a new task to a stage. Tasks start waiting.
    pub async fn add_task(&self, params: &AddTask) -> Result<Task> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.add_task(
                params.stage_id,
                &params.name,
                params.description.as_deref(),
                params.quantity,
                params.unit.as_deref(),
                params.required,
            )
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a single task by its ID.
    pub async fn get_task(&self, params: &Id) -> Result<Option<Task>> {
        let db_path = self.db_path.clone();
        let task_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_task(task_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a stage's tasks in creation order.
    pub async fn get_tasks(&self, params: &Id) -> Result<crate::display::Tasks> {
        let db_path = self.db_path.clone();
        let stage_id = params.id;

        let tasks = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_tasks(stage_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::Tasks(tasks))
    }

    /// Binds a task to a workplace, required position and/or worker,
    /// validated against the personnel directory before writing.
    pub async fn assign_task(&self, params: &Assign) -> Result<Task> {
        let task = self
            .get_task(&Id { id: params.id })
            .await?
            .ok_or(EngineError::TaskNotFound { id: params.id })?;

        let position = params
            .position
            .clone()
            .or_else(|| task.required_position.clone());

        if let Some(position) = &position {
            if let Some(worker) = &params.assignee {
                if !self.directory.holds_position(worker, position)? {
                    return Err(EngineError::AssignmentRejected {
                        reason: format!("worker '{worker}' does not hold position '{position}'"),
                    });
                }
            }

            let workplace = params.workplace.as_ref().or(task.workplace.as_ref());
            if let Some(workplace) = workplace {
                if !self.directory.workplace_accepts(workplace, position)? {
                    return Err(EngineError::AssignmentRejected {
                        reason: format!(
                            "workplace '{workplace}' does not accept position '{position}'"
                        ),
                    });
                }
            }
        }

        let db_path = self.db_path.clone();
        let task_id = params.id;
        let workplace = params.workplace.clone();
        let assignee = params.assignee.clone();
        let required_position = params.position.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.set_task_assignment(task_id, workplace, required_position, assignee)?;
            db.get_task(task_id)?
                .ok_or(EngineError::TaskNotFound { id: task_id })
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Starts a waiting task, or resumes a paused one.
    pub async fn start_task(&self, params: &Transition) -> Result<Task> {
        self.transition_task(params, TransitionKind::Start).await
    }

    /// Pauses an in-progress task.
    pub async fn pause_task(&self, params: &Transition) -> Result<Task> {
        self.transition_task(params, TransitionKind::Pause).await
    }

    /// Completes an in-progress or paused task.
    pub async fn complete_task(&self, params: &Transition) -> Result<Task> {
        self.transition_task(params, TransitionKind::Complete).await
    }

    /// Flags a problem on a task.
    pub async fn flag_task_problem(&self, params: &Transition) -> Result<Task> {
        self.transition_task(params, TransitionKind::FlagProblem)
            .await
    }

    /// Cancels a task.
    pub async fn cancel_task(&self, params: &Transition) -> Result<Task> {
        self.transition_task(params, TransitionKind::Cancel).await
    }

    /// Retrieves a task's full status history in chronological order.
    pub async fn task_history(&self, params: &Id) -> Result<crate::display::History> {
        let db_path = self.db_path.clone();
        let task_id = params.id;

        let entries = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_history(Subject::Task, task_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::History(entries))
    }

    async fn transition_task(&self, params: &Transition, kind: TransitionKind) -> Result<Task> {
        let db_path = self.db_path.clone();
        let policy = self.policy;
        let task_id = params.id;
        let actor = params.actor.clone();
        let note = params.note.clone();

        task::spawn_blocking(move || {
            run_transition(
                &db_path,
                Subject::Task,
                task_id,
                kind,
                &actor,
                note.as_deref(),
                policy,
            )?;
            let db = Database::new(&db_path)?;
            db.get_task(task_id)?
                .ok_or(EngineError::TaskNotFound { id: task_id })
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
