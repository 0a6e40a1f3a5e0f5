//! Stage template operations for the Engine.

use tokio::task;

use super::Engine;
use crate::{
    db::Database,
    error::{EngineError, Result},
    models::{StageTemplate, TemplateStep},
    params::{AddTemplateStep, CreateTemplate, Id, ListTemplates},
};

impl Engine {
    /// Creates a new stage template with the given name and optional
    /// description. Steps are added separately.
    pub async fn create_template(&self, params: &CreateTemplate) -> Result<StageTemplate> {
        let db_path = self.db_path.clone();
        let name = params.name.clone();
        let description = params.description.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_template(&name, description.as_deref())
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Appends a step to a template. Steps are numbered contiguously in
    /// insertion order.
    pub async fn add_template_step(&self, params: &AddTemplateStep) -> Result<TemplateStep> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.add_template_step(
                params.template_id,
                &params.name,
                params.description.as_deref(),
                params.expected_duration_minutes,
                params.default_workplace.as_deref(),
                params.required_position.as_deref(),
                params.required,
            )
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a template with its ordered steps.
    pub async fn get_template(&self, params: &Id) -> Result<Option<StageTemplate>> {
        let db_path = self.db_path.clone();
        let template_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_template(template_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists templates, active ones by default.
    pub async fn list_templates(&self, params: &ListTemplates) -> Result<crate::display::Templates> {
        let db_path = self.db_path.clone();
        let include_inactive = params.include_inactive;

        let templates = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_templates(include_inactive)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::Templates(templates))
    }

    /// Retires a template so it is no longer offered for new plans.
    /// Plans already materialized from it are unaffected.
    pub async fn deactivate_template(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let template_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.deactivate_template(template_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Permanently deletes a template and its steps. Existing plans keep
    /// their stages; their template link is cleared.
    pub async fn delete_template(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let template_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.delete_template(template_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
