//! Template store: CRUD and ordering validation for stage templates.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, EngineError, Result},
    models::{StageTemplate, TemplateStep},
};

const INSERT_TEMPLATE_SQL: &str =
    "INSERT INTO stage_templates (name, description, active, created_at, updated_at) VALUES (?1, ?2, 1, ?3, ?4)";
const CHECK_TEMPLATE_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM stage_templates WHERE id = ?1)";
const NEXT_STEP_NO_SQL: &str =
    "SELECT COALESCE(MAX(step_no), 0) + 1 FROM template_steps WHERE template_id = ?1";
const INSERT_TEMPLATE_STEP_SQL: &str = "INSERT INTO template_steps (template_id, step_no, name, description, expected_duration_minutes, default_workplace, required_position, required) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_TEMPLATE_SQL: &str =
    "SELECT id, name, description, active, created_at, updated_at FROM stage_templates WHERE id = ?1";
const SELECT_TEMPLATES_SQL: &str =
    "SELECT id, name, description, active, created_at, updated_at FROM stage_templates";
const SELECT_TEMPLATE_STEPS_SQL: &str = "SELECT id, template_id, step_no, name, description, expected_duration_minutes, default_workplace, required_position, required FROM template_steps WHERE template_id = ?1 ORDER BY step_no";
const DEACTIVATE_TEMPLATE_SQL: &str =
    "UPDATE stage_templates SET active = 0, updated_at = ?1 WHERE id = ?2";
const DELETE_TEMPLATE_SQL: &str = "DELETE FROM stage_templates WHERE id = ?1";
const UPDATE_TEMPLATE_TIMESTAMP_SQL: &str =
    "UPDATE stage_templates SET updated_at = ?1 WHERE id = ?2";

/// Loads a template's steps in step_no order. Usable inside a
/// transaction, which derefs to `Connection`.
pub(crate) fn template_steps_on(
    conn: &Connection,
    template_id: u64,
) -> rusqlite::Result<Vec<TemplateStep>> {
    let mut stmt = conn.prepare(SELECT_TEMPLATE_STEPS_SQL)?;
    let steps = stmt
        .query_map(params![template_id as i64], build_step_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(steps)
}

/// Verifies that step numbers form a dense 1..N sequence.
///
/// Plan materialization refuses templates whose numbering has gaps or
/// duplicates.
pub(crate) fn check_step_numbering(template_id: u64, steps: &[TemplateStep]) -> Result<()> {
    for (i, step) in steps.iter().enumerate() {
        let expected = (i + 1) as u32;
        if step.step_no != expected {
            return Err(EngineError::InvalidTemplate {
                id: template_id,
                reason: format!(
                    "step numbering is not contiguous: expected step {expected}, found {}",
                    step.step_no
                ),
            });
        }
    }
    Ok(())
}

fn build_step_from_row(row: &rusqlite::Row) -> rusqlite::Result<TemplateStep> {
    Ok(TemplateStep {
        id: row.get::<_, i64>(0)? as u64,
        template_id: row.get::<_, i64>(1)? as u64,
        step_no: row.get::<_, i64>(2)? as u32,
        name: row.get(3)?,
        description: row.get(4)?,
        expected_duration_minutes: row.get::<_, Option<i64>>(5)?.map(|m| m as u32),
        default_workplace: row.get(6)?,
        required_position: row.get(7)?,
        required: row.get(8)?,
    })
}

fn build_template_from_row(row: &rusqlite::Row) -> rusqlite::Result<StageTemplate> {
    Ok(StageTemplate {
        id: row.get::<_, i64>(0)? as u64,
        name: row.get(1)?,
        description: row.get(2)?,
        active: row.get(3)?,
        created_at: super::parse_timestamp(4, row.get(4)?)?,
        updated_at: super::parse_timestamp(5, row.get(5)?)?,
        steps: Vec::new(),
    })
}

impl super::Database {
    /// Creates a new stage template with no steps.
    pub fn create_template(&mut self, name: &str, description: Option<&str>) -> Result<StageTemplate> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(INSERT_TEMPLATE_SQL, params![name, description, &now_str, &now_str])
            .db_context("Failed to insert template")?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(StageTemplate {
            id,
            name: name.to_string(),
            description: description.map(String::from),
            active: true,
            created_at: now,
            updated_at: now,
            steps: Vec::new(),
        })
    }

    /// Appends a step to a template with the next contiguous step_no.
    #[allow(clippy::too_many_arguments)]
    pub fn add_template_step(
        &mut self,
        template_id: u64,
        name: &str,
        description: Option<&str>,
        expected_duration_minutes: Option<u32>,
        default_workplace: Option<&str>,
        required_position: Option<&str>,
        required: bool,
    ) -> Result<TemplateStep> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_TEMPLATE_EXISTS_SQL, params![template_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check template existence")?;

        if !exists {
            return Err(EngineError::TemplateNotFound { id: template_id });
        }

        let step_no: i64 = tx
            .query_row(NEXT_STEP_NO_SQL, params![template_id as i64], |row| row.get(0))
            .db_context("Failed to get next step number")?;

        tx.execute(
            INSERT_TEMPLATE_STEP_SQL,
            params![
                template_id as i64,
                step_no,
                name,
                description,
                expected_duration_minutes.map(i64::from),
                default_workplace,
                required_position,
                required
            ],
        )
        .db_context("Failed to insert template step")?;

        let id = tx.last_insert_rowid() as u64;

        let now_str = Timestamp::now().to_string();
        tx.execute(UPDATE_TEMPLATE_TIMESTAMP_SQL, params![&now_str, template_id as i64])
            .db_context("Failed to update template timestamp")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(TemplateStep {
            id,
            template_id,
            step_no: step_no as u32,
            name: name.to_string(),
            description: description.map(String::from),
            expected_duration_minutes,
            default_workplace: default_workplace.map(String::from),
            required_position: required_position.map(String::from),
            required,
        })
    }

    /// Retrieves a template with its ordered steps.
    pub fn get_template(&self, id: u64) -> Result<Option<StageTemplate>> {
        let template = self
            .connection
            .query_row(SELECT_TEMPLATE_SQL, params![id as i64], build_template_from_row)
            .optional()
            .db_context("Failed to query template")?;

        match template {
            Some(mut template) => {
                template.steps = template_steps_on(&self.connection, id)
                    .db_context("Failed to query template steps")?;
                Ok(Some(template))
            }
            None => Ok(None),
        }
    }

    /// Lists templates without their steps.
    pub fn list_templates(&self, include_inactive: bool) -> Result<Vec<StageTemplate>> {
        let mut query = SELECT_TEMPLATES_SQL.to_string();
        if !include_inactive {
            query.push_str(" WHERE active = 1");
        }
        query.push_str(" ORDER BY name");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let templates = stmt
            .query_map([], build_template_from_row)
            .db_context("Failed to query templates")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch templates")?;

        Ok(templates)
    }

    /// Marks a template inactive so it is no longer offered for new plans.
    pub fn deactivate_template(&mut self, id: u64) -> Result<()> {
        let now_str = Timestamp::now().to_string();
        let rows = self
            .connection
            .execute(DEACTIVATE_TEMPLATE_SQL, params![&now_str, id as i64])
            .db_context("Failed to deactivate template")?;

        if rows == 0 {
            return Err(EngineError::TemplateNotFound { id });
        }
        Ok(())
    }

    /// Permanently deletes a template and its steps. Stages created from
    /// the template keep running; their template_step_id is nulled.
    pub fn delete_template(&mut self, id: u64) -> Result<()> {
        let rows = self
            .connection
            .execute(DELETE_TEMPLATE_SQL, params![id as i64])
            .db_context("Failed to delete template")?;

        if rows == 0 {
            return Err(EngineError::TemplateNotFound { id });
        }
        Ok(())
    }
}
