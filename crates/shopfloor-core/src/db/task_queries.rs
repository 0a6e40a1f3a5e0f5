//! Task CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, EngineError, Result},
    models::{Task, WorkStatus},
};

const CHECK_STAGE_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM stages WHERE id = ?1)";
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (stage_id, name, description, status, quantity, unit, required, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const SELECT_TASK_COLS: &str = "id, stage_id, name, description, status, quantity, unit, required, workplace, required_position, assignee, started_at, finished_at, created_at, updated_at";
const UPDATE_STAGE_TIMESTAMP_SQL: &str = "UPDATE stages SET updated_at = ?1 WHERE id = ?2";
const SELECT_TASK_ASSIGNMENT_SQL: &str =
    "SELECT workplace, required_position, assignee FROM tasks WHERE id = ?1";
const UPDATE_TASK_ASSIGNMENT_SQL: &str = "UPDATE tasks SET workplace = ?1, required_position = ?2, assignee = ?3, updated_at = ?4 WHERE id = ?5";

pub(crate) fn build_task_from_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let status: String = row.get(4)?;

    Ok(Task {
        id: row.get::<_, i64>(0)? as u64,
        stage_id: row.get::<_, i64>(1)? as u64,
        name: row.get(2)?,
        description: row.get(3)?,
        status: super::parse_enum(4, &status)?,
        quantity: row.get(5)?,
        unit: row.get(6)?,
        required: row.get(7)?,
        workplace: row.get(8)?,
        required_position: row.get(9)?,
        assignee: row.get(10)?,
        started_at: super::parse_opt_timestamp(11, row.get(11)?)?,
        finished_at: super::parse_opt_timestamp(12, row.get(12)?)?,
        created_at: super::parse_timestamp(13, row.get(13)?)?,
        updated_at: super::parse_timestamp(14, row.get(14)?)?,
    })
}

impl super::Database {
    /// Adds a new task to the specified stage.
    pub fn add_task(
        &mut self,
        stage_id: u64,
        name: &str,
        description: Option<&str>,
        quantity: Option<f64>,
        unit: Option<&str>,
        required: bool,
    ) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let stage_exists: bool = tx
            .query_row(CHECK_STAGE_EXISTS_SQL, params![stage_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check stage existence")?;

        if !stage_exists {
            return Err(EngineError::StageNotFound { id: stage_id });
        }

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_TASK_SQL,
            params![
                stage_id as i64,
                name,
                description,
                WorkStatus::Waiting.as_str(),
                quantity,
                unit,
                required,
                &now_str,
                &now_str
            ],
        )
        .db_context("Failed to insert task")?;

        let id = tx.last_insert_rowid() as u64;

        tx.execute(UPDATE_STAGE_TIMESTAMP_SQL, params![&now_str, stage_id as i64])
            .db_context("Failed to update stage timestamp")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Task {
            id,
            stage_id,
            name: name.to_string(),
            description: description.map(String::from),
            status: WorkStatus::Waiting,
            quantity,
            unit: unit.map(String::from),
            required,
            workplace: None,
            required_position: None,
            assignee: None,
            started_at: None,
            finished_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves all tasks for a given stage.
    pub fn get_tasks(&self, stage_id: u64) -> Result<Vec<Task>> {
        let query =
            format!("SELECT {SELECT_TASK_COLS} FROM tasks WHERE stage_id = ?1 ORDER BY id");
        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let tasks = stmt
            .query_map(params![stage_id as i64], build_task_from_row)
            .db_context("Failed to query tasks")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch tasks")?;

        Ok(tasks)
    }

    /// Retrieves a single task by its ID.
    pub fn get_task(&self, task_id: u64) -> Result<Option<Task>> {
        let query = format!("SELECT {SELECT_TASK_COLS} FROM tasks WHERE id = ?1");
        let task = self
            .connection
            .query_row(&query, params![task_id as i64], build_task_from_row)
            .optional()
            .db_context("Failed to get task")?;

        Ok(task)
    }

    /// Persists a task assignment. Fields left as None keep their
    /// current value. Personnel validation happens before this call.
    pub fn set_task_assignment(
        &mut self,
        task_id: u64,
        workplace: Option<String>,
        required_position: Option<String>,
        assignee: Option<String>,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let (current_workplace, current_position, current_assignee): (
            Option<String>,
            Option<String>,
            Option<String>,
        ) = tx
            .query_row(SELECT_TASK_ASSIGNMENT_SQL, params![task_id as i64], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e| {
                if matches!(e, rusqlite::Error::QueryReturnedNoRows) {
                    EngineError::TaskNotFound { id: task_id }
                } else {
                    EngineError::database_error("Failed to query task assignment", e)
                }
            })?;

        let now_str = Timestamp::now().to_string();
        tx.execute(
            UPDATE_TASK_ASSIGNMENT_SQL,
            params![
                workplace.or(current_workplace),
                required_position.or(current_position),
                assignee.or(current_assignee),
                &now_str,
                task_id as i64
            ],
        )
        .db_context("Failed to update task assignment")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }
}
