//! Stage operations for the Engine: queue moves, lifecycle transitions,
//! assignment and history.

use tokio::task;

use super::{run_transition, Engine};
use crate::{
    db::{Database, Subject},
    error::{EngineError, Result},
    models::{Stage, TransitionKind},
    params::{Assign, Id, MoveStage, Transition},
};

impl Engine {
    /// Retrieves a single stage by its ID.
    pub async fn get_stage(&self, params: &Id) -> Result<Option<Stage>> {
        let db_path = self.db_path.clone();
        let stage_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_stage(stage_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a plan's stages in queue order.
    pub async fn get_stages(&self, params: &Id) -> Result<crate::display::Stages> {
        let db_path = self.db_path.clone();
        let plan_id = params.id;

        let stages = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_stages(plan_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::Stages(stages))
    }

    /// Moves a stage to a new position in its plan's queue.
    ///
    /// Positions are 1-indexed; targets past the end clamp to the last
    /// position. The queue stays dense: every other stage shifts by at
    /// most one. Moving a stage onto its current position is a no-op.
    pub async fn move_stage(&self, params: &MoveStage) -> Result<crate::display::Stages> {
        let db_path = self.db_path.clone();
        let stage_id = params.stage_id;
        let position = params.position;

        let stages = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.move_stage(stage_id, position)?;
            let stage = db
                .get_stage(stage_id)?
                .ok_or(EngineError::StageNotFound { id: stage_id })?;
            db.get_stages(stage.plan_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::Stages(stages))
    }

    /// Binds a stage to a workplace, required position and/or worker.
    ///
    /// The assignment is validated against the personnel directory
    /// before anything is written: a worker must hold the stage's
    /// required position and the workplace must accept it. A rejected
    /// assignment leaves the stage untouched.
    pub async fn assign_stage(&self, params: &Assign) -> Result<Stage> {
        let stage = self
            .get_stage(&Id { id: params.id })
            .await?
            .ok_or(EngineError::StageNotFound { id: params.id })?;

        let position = params
            .position
            .clone()
            .or_else(|| stage.required_position.clone());

        if let Some(position) = &position {
            if let Some(worker) = &params.assignee {
                if !self.directory.holds_position(worker, position)? {
                    return Err(EngineError::AssignmentRejected {
                        reason: format!("worker '{worker}' does not hold position '{position}'"),
                    });
                }
            }

            let workplace = params.workplace.as_ref().or(stage.workplace.as_ref());
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
        let stage_id = params.id;
        let workplace = params.workplace.clone();
        let assignee = params.assignee.clone();
        let required_position = params.position.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.set_stage_assignment(stage_id, workplace, required_position, assignee)?;
            db.get_stage(stage_id)?
                .ok_or(EngineError::StageNotFound { id: stage_id })
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Starts a waiting stage, or resumes a paused one.
    pub async fn start_stage(&self, params: &Transition) -> Result<Stage> {
        self.transition_stage(params, TransitionKind::Start).await
    }

    /// Pauses an in-progress stage.
    pub async fn pause_stage(&self, params: &Transition) -> Result<Stage> {
        self.transition_stage(params, TransitionKind::Pause).await
    }

    /// Completes an in-progress or paused stage, stamping its finish
    /// time and actual duration.
    pub async fn complete_stage(&self, params: &Transition) -> Result<Stage> {
        self.transition_stage(params, TransitionKind::Complete).await
    }

    /// Flags a problem on a stage, parking it until resolved.
    pub async fn flag_stage_problem(&self, params: &Transition) -> Result<Stage> {
        self.transition_stage(params, TransitionKind::FlagProblem)
            .await
    }

    /// Cancels a stage.
    pub async fn cancel_stage(&self, params: &Transition) -> Result<Stage> {
        self.transition_stage(params, TransitionKind::Cancel).await
    }

    /// Retrieves a stage's full status history in chronological order.
    pub async fn stage_history(&self, params: &Id) -> Result<crate::display::History> {
        let db_path = self.db_path.clone();
        let stage_id = params.id;

        let entries = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_history(Subject::Stage, stage_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::History(entries))
    }

    async fn transition_stage(&self, params: &Transition, kind: TransitionKind) -> Result<Stage> {
        let db_path = self.db_path.clone();
        let policy = self.policy;
        let stage_id = params.id;
        let actor = params.actor.clone();
        let note = params.note.clone();

        task::spawn_blocking(move || {
            run_transition(
                &db_path,
                Subject::Stage,
                stage_id,
                kind,
                &actor,
                note.as_deref(),
                policy,
            )?;
            let db = Database::new(&db_path)?;
            db.get_stage(stage_id)?
                .ok_or(EngineError::StageNotFound { id: stage_id })
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
