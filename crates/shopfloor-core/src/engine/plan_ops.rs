//! Plan operations for the Engine.

use tokio::task;

use super::Engine;
use crate::{
    db::Database,
    error::{EngineError, Result},
    models::{Plan, PlanFilter},
    params::{CopyTemplateToPlan, CreatePlanFromTemplate, Id, ListPlans},
};

impl Engine {
    /// Materializes a new plan from a template.
    ///
    /// Every step of the template becomes a waiting stage, queued in
    /// step order. The whole instantiation is atomic: either the plan
    /// appears with all its stages or not at all.
    pub async fn create_plan_from_template(
        &self,
        params: &CreatePlanFromTemplate,
    ) -> Result<Plan> {
        let (priority, planned_start, due_at) = params.validate()?;
        let db_path = self.db_path.clone();
        let template_id = params.template_id;
        let title = params.title.clone();
        let order_ref = params.order_ref.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_plan_from_template(
                template_id,
                &title,
                order_ref.as_deref(),
                priority,
                planned_start,
                due_at,
            )
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Applies a template to the plan of an order, creating the plan if
    /// the order has none yet.
    ///
    /// Re-applying to an existing plan is destructive: the current stage
    /// queue is discarded and regenerated from the template. Returns the
    /// plan with its fresh stage queue.
    pub async fn copy_template_to_plan(&self, params: &CopyTemplateToPlan) -> Result<Plan> {
        let db_path = self.db_path.clone();
        let order_ref = params.order_ref.clone();
        let template_id = params.template_id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let plan_id = db.copy_template_to_plan(&order_ref, template_id)?;
            db.get_plan(plan_id)?
                .ok_or(EngineError::PlanNotFound {
                    reference: plan_id.to_string(),
                })
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a plan by its ID.
    pub async fn get_plan(&self, params: &Id) -> Result<Option<Plan>> {
        let db_path = self.db_path.clone();
        let plan_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_plan(plan_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a plan by its external order reference.
    pub async fn get_plan_by_order_ref(&self, order_ref: &str) -> Result<Option<Plan>> {
        let db_path = self.db_path.clone();
        let order_ref = order_ref.to_string();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_plan_by_order_ref(&order_ref)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists plans with stage progress counts.
    pub async fn list_plans_summary(
        &self,
        params: &ListPlans,
    ) -> Result<crate::display::PlanSummaries> {
        let db_path = self.db_path.clone();
        let filter = PlanFilter::from(params);

        let summaries = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_plan_summaries(Some(&filter))
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::PlanSummaries(summaries))
    }

    /// Archives a plan (soft delete).
    pub async fn archive_plan(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let plan_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.archive_plan(plan_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Restores an archived plan to the active list.
    pub async fn unarchive_plan(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let plan_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.unarchive_plan(plan_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Permanently deletes a plan, its stages, tasks and status logs.
    /// Uses get-before-delete to return the deleted plan for
    /// confirmation, or None if it never existed.
    pub async fn delete_plan(&self, params: &Id) -> Result<Option<Plan>> {
        let db_path = self.db_path.clone();
        let plan_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let plan = db.get_plan(plan_id)?;
            if plan.is_some() {
                db.delete_plan(plan_id)?;
            }
            Ok(plan)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
