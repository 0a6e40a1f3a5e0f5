//! Stage queries and the queue manager.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, EngineError, Result},
    models::Stage,
};

pub(crate) const SELECT_STAGE_COLS: &str = "id, plan_id, template_step_id, step_no, name, description, status, order_in_queue, workplace, required_position, assignee, started_at, finished_at, actual_duration_secs, notes, created_at, updated_at";
const SELECT_STAGE_QUEUE_POS_SQL: &str = "SELECT plan_id, order_in_queue FROM stages WHERE id = ?1";
const COUNT_PLAN_STAGES_SQL: &str = "SELECT COUNT(*) FROM stages WHERE plan_id = ?1";
const SHIFT_QUEUE_UP_SQL: &str = "UPDATE stages SET order_in_queue = order_in_queue + 1 WHERE plan_id = ?1 AND order_in_queue >= ?2 AND order_in_queue < ?3";
const SHIFT_QUEUE_DOWN_SQL: &str = "UPDATE stages SET order_in_queue = order_in_queue - 1 WHERE plan_id = ?1 AND order_in_queue > ?2 AND order_in_queue <= ?3";
const PLACE_STAGE_SQL: &str =
    "UPDATE stages SET order_in_queue = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_PLAN_TIMESTAMP_SQL: &str = "UPDATE plans SET updated_at = ?1 WHERE id = ?2";
const SELECT_STAGE_ASSIGNMENT_SQL: &str =
    "SELECT workplace, required_position, assignee FROM stages WHERE id = ?1";
const UPDATE_STAGE_ASSIGNMENT_SQL: &str = "UPDATE stages SET workplace = ?1, required_position = ?2, assignee = ?3, updated_at = ?4 WHERE id = ?5";

pub(crate) fn build_stage_from_row(row: &rusqlite::Row) -> rusqlite::Result<Stage> {
    let status: String = row.get(6)?;

    Ok(Stage {
        id: row.get::<_, i64>(0)? as u64,
        plan_id: row.get::<_, i64>(1)? as u64,
        template_step_id: row.get::<_, Option<i64>>(2)?.map(|id| id as u64),
        step_no: row.get::<_, i64>(3)? as u32,
        name: row.get(4)?,
        description: row.get(5)?,
        status: super::parse_enum(6, &status)?,
        order_in_queue: row.get::<_, i64>(7)? as u32,
        workplace: row.get(8)?,
        required_position: row.get(9)?,
        assignee: row.get(10)?,
        started_at: super::parse_opt_timestamp(11, row.get(11)?)?,
        finished_at: super::parse_opt_timestamp(12, row.get(12)?)?,
        actual_duration_secs: row.get(13)?,
        notes: row.get(14)?,
        created_at: super::parse_timestamp(15, row.get(15)?)?,
        updated_at: super::parse_timestamp(16, row.get(16)?)?,
        tasks: Vec::new(),
    })
}

impl super::Database {
    /// Retrieves a single stage by its ID.
    pub fn get_stage(&self, stage_id: u64) -> Result<Option<Stage>> {
        let query = format!("SELECT {SELECT_STAGE_COLS} FROM stages WHERE id = ?1");
        let stage = self
            .connection
            .query_row(&query, params![stage_id as i64], build_stage_from_row)
            .optional()
            .db_context("Failed to get stage")?;

        Ok(stage)
    }

    /// Retrieves a plan's stages ordered by queue position.
    pub fn get_stages(&self, plan_id: u64) -> Result<Vec<Stage>> {
        let query =
            format!("SELECT {SELECT_STAGE_COLS} FROM stages WHERE plan_id = ?1 ORDER BY order_in_queue");
        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let stages = stmt
            .query_map(params![plan_id as i64], build_stage_from_row)
            .db_context("Failed to query stages")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch stages")?;

        Ok(stages)
    }

    /// Moves a stage to a new queue position within its plan.
    ///
    /// Every stage between the old and new position shifts by exactly
    /// one slot, then the moved stage is placed; the whole sequence is
    /// one transaction, so the dense 1..N queue invariant holds at
    /// every point observable from outside. Moving a stage to its
    /// current position writes nothing. A position past the end of the
    /// queue clamps to the last position. Queue moves are not audited;
    /// only status changes are.
    pub fn move_stage(&mut self, stage_id: u64, new_position: u32) -> Result<()> {
        if new_position < 1 {
            return Err(EngineError::invalid_input(
                "position",
                "Queue positions are 1-indexed",
            ));
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let (plan_id, old_position): (i64, i64) = tx
            .query_row(SELECT_STAGE_QUEUE_POS_SQL, params![stage_id as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .map_err(|e| {
                if matches!(e, rusqlite::Error::QueryReturnedNoRows) {
                    EngineError::StageNotFound { id: stage_id }
                } else {
                    EngineError::database_error("Failed to query stage", e)
                }
            })?;

        let stage_count: i64 = tx
            .query_row(COUNT_PLAN_STAGES_SQL, params![plan_id], |row| row.get(0))
            .db_context("Failed to count stages")?;

        // Clamp past-the-end targets to append semantics
        let new_position = i64::from(new_position).min(stage_count);

        if new_position == old_position {
            return Ok(());
        }

        if new_position < old_position {
            tx.execute(SHIFT_QUEUE_UP_SQL, params![plan_id, new_position, old_position])
                .db_context("Failed to shift queue positions up")?;
        } else {
            tx.execute(SHIFT_QUEUE_DOWN_SQL, params![plan_id, old_position, new_position])
                .db_context("Failed to shift queue positions down")?;
        }

        let now_str = Timestamp::now().to_string();
        tx.execute(PLACE_STAGE_SQL, params![new_position, &now_str, stage_id as i64])
            .db_context("Failed to place stage")?;

        tx.execute(UPDATE_PLAN_TIMESTAMP_SQL, params![&now_str, plan_id])
            .db_context("Failed to update plan timestamp")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }

    /// Persists a stage assignment. Fields left as None keep their
    /// current value. Personnel validation happens before this call;
    /// this only writes.
    pub fn set_stage_assignment(
        &mut self,
        stage_id: u64,
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
            .query_row(SELECT_STAGE_ASSIGNMENT_SQL, params![stage_id as i64], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e| {
                if matches!(e, rusqlite::Error::QueryReturnedNoRows) {
                    EngineError::StageNotFound { id: stage_id }
                } else {
                    EngineError::database_error("Failed to query stage assignment", e)
                }
            })?;

        let now_str = Timestamp::now().to_string();
        tx.execute(
            UPDATE_STAGE_ASSIGNMENT_SQL,
            params![
                workplace.or(current_workplace),
                required_position.or(current_position),
                assignee.or(current_assignee),
                &now_str,
                stage_id as i64
            ],
        )
        .db_context("Failed to update stage assignment")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }
}
