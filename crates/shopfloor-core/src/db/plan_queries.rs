//! Plan factory and plan queries.
//!
//! Plans are materialized from templates in a single transaction: the
//! plan row plus one stage per template step, queue positions assigned
//! 1..N in step order. No audit rows are written for initial creation;
//! only subsequent status transitions are logged.

use jiff::Timestamp;
use rusqlite::{params, Transaction, OptionalExtension};

use crate::{
    db::template_queries::{check_step_numbering, template_steps_on},
    error::{DatabaseResultExt, EngineError, Result},
    models::{Plan, PlanFilter, PlanSummary, Priority, TemplateStep, WorkStatus},
};

const CHECK_TEMPLATE_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM stage_templates WHERE id = ?1)";
const INSERT_PLAN_SQL: &str = "INSERT INTO plans (template_id, order_ref, title, notes, priority, status, planned_start, due_at, archived, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10)";
const INSERT_STAGE_SQL: &str = "INSERT INTO stages (plan_id, template_step_id, step_no, name, description, status, order_in_queue, workplace, required_position, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const SELECT_PLAN_COLS: &str = "id, template_id, order_ref, title, notes, priority, status, planned_start, due_at, archived, created_at, updated_at";
const SELECT_PLAN_BY_ORDER_REF_SQL: &str = "SELECT id FROM plans WHERE order_ref = ?1";
const RELINK_PLAN_TEMPLATE_SQL: &str =
    "UPDATE plans SET template_id = ?1, updated_at = ?2 WHERE id = ?3";
const DELETE_PLAN_STAGES_SQL: &str = "DELETE FROM stages WHERE plan_id = ?1";
const ARCHIVE_PLAN_SQL: &str =
    "UPDATE plans SET archived = ?1, updated_at = ?2 WHERE id = ?3 AND archived = ?4";
const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)";
const DELETE_PLAN_SQL: &str = "DELETE FROM plans WHERE id = ?1";

fn build_plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<Plan> {
    let priority: String = row.get(5)?;
    let status: String = row.get(6)?;

    Ok(Plan {
        id: row.get::<_, i64>(0)? as u64,
        template_id: row.get::<_, Option<i64>>(1)?.map(|id| id as u64),
        order_ref: row.get(2)?,
        title: row.get(3)?,
        notes: row.get(4)?,
        priority: super::parse_enum(5, &priority)?,
        status: super::parse_enum(6, &status)?,
        planned_start: super::parse_opt_timestamp(7, row.get(7)?)?,
        due_at: super::parse_opt_timestamp(8, row.get(8)?)?,
        archived: row.get(9)?,
        created_at: super::parse_timestamp(10, row.get(10)?)?,
        updated_at: super::parse_timestamp(11, row.get(11)?)?,
        stages: Vec::new(),
    })
}

fn build_summary_from_row(row: &rusqlite::Row) -> rusqlite::Result<PlanSummary> {
    let priority: String = row.get(3)?;
    let status: String = row.get(4)?;

    Ok(PlanSummary {
        id: row.get::<_, i64>(0)? as u64,
        order_ref: row.get(1)?,
        title: row.get(2)?,
        priority: super::parse_enum(3, &priority)?,
        status: super::parse_enum(4, &status)?,
        created_at: super::parse_timestamp(5, row.get(5)?)?,
        updated_at: super::parse_timestamp(6, row.get(6)?)?,
        total_stages: row.get::<_, i64>(7)? as u32,
        completed_stages: row.get::<_, i64>(8)? as u32,
    })
}

/// Loads and validates a template's steps inside the given transaction.
fn validated_template_steps(tx: &Transaction, template_id: u64) -> Result<Vec<TemplateStep>> {
    let exists: bool = tx
        .query_row(CHECK_TEMPLATE_EXISTS_SQL, params![template_id as i64], |row| {
            row.get(0)
        })
        .db_context("Failed to check template existence")?;

    if !exists {
        return Err(EngineError::TemplateNotFound { id: template_id });
    }

    let steps =
        template_steps_on(tx, template_id).db_context("Failed to query template steps")?;
    check_step_numbering(template_id, &steps)?;
    Ok(steps)
}

/// Inserts one waiting stage per template step, queue positions 1..N.
fn materialize_stages(
    tx: &Transaction,
    plan_id: u64,
    steps: &[TemplateStep],
    now_str: &str,
) -> Result<()> {
    for (idx, step) in steps.iter().enumerate() {
        tx.execute(
            INSERT_STAGE_SQL,
            params![
                plan_id as i64,
                step.id as i64,
                step.step_no as i64,
                &step.name,
                &step.description,
                WorkStatus::Waiting.as_str(),
                (idx + 1) as i64,
                &step.default_workplace,
                &step.required_position,
                now_str,
                now_str
            ],
        )
        .db_context("Failed to insert stage")?;
    }
    Ok(())
}

impl super::Database {
    /// Materializes a new plan from a template.
    ///
    /// The plan is created active; each template step becomes a waiting
    /// stage with sequential queue positions. A zero-step template
    /// produces an empty plan, which is legal.
    pub fn create_plan_from_template(
        &mut self,
        template_id: u64,
        title: &str,
        order_ref: Option<&str>,
        priority: Priority,
        planned_start: Option<Timestamp>,
        due_at: Option<Timestamp>,
    ) -> Result<Plan> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let steps = validated_template_steps(&tx, template_id)?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_PLAN_SQL,
            params![
                template_id as i64,
                order_ref,
                title,
                None::<String>,
                priority.as_str(),
                "active",
                planned_start.map(|t| t.to_string()),
                due_at.map(|t| t.to_string()),
                &now_str,
                &now_str
            ],
        )
        .db_context("Failed to insert plan")?;

        let plan_id = tx.last_insert_rowid() as u64;

        materialize_stages(&tx, plan_id, &steps, &now_str)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Plan {
            id: plan_id,
            template_id: Some(template_id),
            order_ref: order_ref.map(String::from),
            title: title.to_string(),
            notes: None,
            priority,
            status: crate::models::PlanStatus::Active,
            planned_start,
            due_at,
            archived: false,
            created_at: now,
            updated_at: now,
            stages: Vec::new(),
        })
    }

    /// Applies a template to the plan for an order reference.
    ///
    /// If a plan already exists for the order it is reused: its template
    /// link is updated and ALL existing stages are deleted and
    /// regenerated. This is a destructive resync; in-flight stage
    /// progress is lost. Callers must treat it as "restart the plan".
    /// Runs in one transaction, so a crash mid-resync leaves either the
    /// old stage set or the new one, never neither.
    pub fn copy_template_to_plan(&mut self, order_ref: &str, template_id: u64) -> Result<u64> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let steps = validated_template_steps(&tx, template_id)?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        let existing: Option<i64> = tx
            .query_row(SELECT_PLAN_BY_ORDER_REF_SQL, params![order_ref], |row| row.get(0))
            .optional()
            .db_context("Failed to query plan by order reference")?;

        let plan_id = match existing {
            Some(id) => {
                tx.execute(
                    RELINK_PLAN_TEMPLATE_SQL,
                    params![template_id as i64, &now_str, id],
                )
                .db_context("Failed to relink plan template")?;
                tx.execute(DELETE_PLAN_STAGES_SQL, params![id])
                    .db_context("Failed to delete existing stages")?;
                id as u64
            }
            None => {
                let title: String = tx
                    .query_row(
                        "SELECT name FROM stage_templates WHERE id = ?1",
                        params![template_id as i64],
                        |row| row.get(0),
                    )
                    .db_context("Failed to query template name")?;

                tx.execute(
                    INSERT_PLAN_SQL,
                    params![
                        template_id as i64,
                        order_ref,
                        &title,
                        None::<String>,
                        Priority::Normal.as_str(),
                        "active",
                        None::<String>,
                        None::<String>,
                        &now_str,
                        &now_str
                    ],
                )
                .db_context("Failed to insert plan")?;
                tx.last_insert_rowid() as u64
            }
        };

        materialize_stages(&tx, plan_id, &steps, &now_str)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(plan_id)
    }

    /// Retrieves a plan by its ID with its stage queue and each
    /// stage's tasks loaded.
    pub fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        let query = format!("SELECT {SELECT_PLAN_COLS} FROM plans WHERE id = ?1");
        let plan = self
            .connection
            .query_row(&query, params![id as i64], build_plan_from_row)
            .optional()
            .db_context("Failed to query plan")?;

        match plan {
            Some(mut plan) => {
                self.load_plan_stages(&mut plan)?;
                Ok(Some(plan))
            }
            None => Ok(None),
        }
    }

    /// Retrieves the plan for an order reference with its stage queue
    /// and each stage's tasks loaded.
    pub fn get_plan_by_order_ref(&self, order_ref: &str) -> Result<Option<Plan>> {
        let query = format!("SELECT {SELECT_PLAN_COLS} FROM plans WHERE order_ref = ?1");
        let plan = self
            .connection
            .query_row(&query, params![order_ref], build_plan_from_row)
            .optional()
            .db_context("Failed to query plan by order reference")?;

        match plan {
            Some(mut plan) => {
                self.load_plan_stages(&mut plan)?;
                Ok(Some(plan))
            }
            None => Ok(None),
        }
    }

    fn load_plan_stages(&self, plan: &mut Plan) -> Result<()> {
        plan.stages = self.get_stages(plan.id)?;
        for stage in &mut plan.stages {
            stage.tasks = self.get_tasks(stage.id)?;
        }
        Ok(())
    }

    /// Lists plan summaries with optional filtering.
    pub fn list_plan_summaries(&self, filter: Option<&PlanFilter>) -> Result<Vec<PlanSummary>> {
        let view_name = if filter.as_ref().is_some_and(|f| f.include_archived) {
            "all_plan_summaries"
        } else {
            "plan_summaries"
        };

        let mut query = format!(
            "SELECT id, order_ref, title, priority, status, created_at, updated_at, total_stages, completed_stages FROM {view_name}"
        );

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(f) = filter {
            if let Some(status) = f.status {
                conditions.push("status = ?");
                params_vec.push(Box::new(status.as_str().to_string()));
            }

            if let Some(ref order_ref) = f.order_ref {
                conditions.push("order_ref = ?");
                params_vec.push(Box::new(order_ref.clone()));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let summaries = stmt
            .query_map(&params_refs[..], build_summary_from_row)
            .db_context("Failed to query plans")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch plans")?;

        Ok(summaries)
    }

    /// Archives a plan (soft delete).
    pub fn archive_plan(&mut self, id: u64) -> Result<()> {
        self.set_archived(id, true)
    }

    /// Unarchives a plan (restores from archive).
    pub fn unarchive_plan(&mut self, id: u64) -> Result<()> {
        self.set_archived(id, false)
    }

    fn set_archived(&mut self, id: u64, archived: bool) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now_str = Timestamp::now().to_string();
        let rows = tx
            .execute(ARCHIVE_PLAN_SQL, params![archived, &now_str, id as i64, !archived])
            .db_context("Failed to update archived flag")?;

        if rows == 0 {
            let exists: bool = tx
                .query_row(CHECK_PLAN_EXISTS_SQL, params![id as i64], |row| row.get(0))
                .db_context("Failed to check plan existence")?;

            if !exists {
                return Err(EngineError::PlanNotFound {
                    reference: id.to_string(),
                });
            }
            // Already in the requested state, which is okay
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }

    /// Permanently deletes a plan, its stages, their tasks and all
    /// associated log rows. This operation cannot be undone.
    pub fn delete_plan(&mut self, id: u64) -> Result<()> {
        let rows = self
            .connection
            .execute(DELETE_PLAN_SQL, params![id as i64])
            .db_context("Failed to delete plan")?;

        if rows == 0 {
            return Err(EngineError::PlanNotFound {
                reference: id.to_string(),
            });
        }
        Ok(())
    }
}
