//! Shared status-transition executor for stages and tasks.
//!
//! One transition = one transaction: read the current status, validate
//! against the lifecycle table, compare-and-set the new status with its
//! timestamp stamps, and append exactly one audit row. The audit write
//! is part of the same transaction; if it cannot be written the
//! transition has not happened. Callers never write log entries
//! directly.

use jiff::Timestamp;
use rusqlite::params;

use crate::{
    db::log_queries::record_transition_on,
    error::{DatabaseResultExt, EngineError, Result},
    models::{TransitionKind, WorkStatus},
};

/// Which kind of entity a transition targets. Each variant carries its
/// own table names, so adding an entity kind means adding a variant
/// rather than branching on a string tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Stage,
    Task,
}

impl Subject {
    pub(crate) fn table(&self) -> &'static str {
        match self {
            Subject::Stage => "stages",
            Subject::Task => "tasks",
        }
    }

    pub(crate) fn log_table(&self) -> &'static str {
        match self {
            Subject::Stage => "stage_status_log",
            Subject::Task => "task_status_log",
        }
    }

    pub(crate) fn log_fk(&self) -> &'static str {
        match self {
            Subject::Stage => "stage_id",
            Subject::Task => "task_id",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Subject::Stage => "stage",
            Subject::Task => "task",
        }
    }

    fn not_found(&self, id: u64) -> EngineError {
        match self {
            Subject::Stage => EngineError::StageNotFound { id },
            Subject::Task => EngineError::TaskNotFound { id },
        }
    }
}

/// Whether completing a stage is blocked by its open required tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Stages complete regardless of their tasks
    #[default]
    Unchecked,
    /// Completing a stage requires every required task to be
    /// completed or cancelled first
    RequireTasks,
}

const COUNT_OPEN_REQUIRED_TASKS_SQL: &str = "SELECT COUNT(*) FROM tasks WHERE stage_id = ?1 AND required = 1 AND status NOT IN ('completed', 'cancelled')";

impl super::Database {
    /// Applies a lifecycle operation to a stage or task.
    ///
    /// The status write is a compare-and-set against the status that was
    /// read at the start of the transaction; zero affected rows means a
    /// concurrent writer got there first and surfaces as
    /// `ConcurrencyConflict` for the caller to retry.
    pub fn apply_transition(
        &mut self,
        subject: Subject,
        id: u64,
        kind: TransitionKind,
        actor: &str,
        note: Option<&str>,
        policy: CompletionPolicy,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let select_sql = format!(
            "SELECT status, started_at FROM {} WHERE id = ?1",
            subject.table()
        );
        let (status_str, started_at_str): (String, Option<String>) = tx
            .query_row(&select_sql, params![id as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .map_err(|e| {
                if matches!(e, rusqlite::Error::QueryReturnedNoRows) {
                    subject.not_found(id)
                } else {
                    EngineError::database_error("Failed to query current status", e)
                }
            })?;

        let current: WorkStatus = status_str
            .parse()
            .map_err(|reason| EngineError::invalid_input("status", reason))?;

        if !kind.allowed_from(current) {
            return Err(EngineError::InvalidTransition {
                subject: format!("{} {id}", subject.label()),
                from: current.as_str().to_string(),
                operation: kind.verb().to_string(),
            });
        }

        if subject == Subject::Stage
            && kind == TransitionKind::Complete
            && policy == CompletionPolicy::RequireTasks
        {
            let open: i64 = tx
                .query_row(COUNT_OPEN_REQUIRED_TASKS_SQL, params![id as i64], |row| {
                    row.get(0)
                })
                .db_context("Failed to count open required tasks")?;

            if open > 0 {
                return Err(EngineError::StageHasOpenTasks {
                    id,
                    open: open as usize,
                });
            }
        }

        let now = Timestamp::now();
        let now_str = now.to_string();
        let target = kind.target();

        let rows = match kind {
            TransitionKind::Start => {
                // COALESCE keeps the original started_at across resumes
                let update_sql = format!(
                    "UPDATE {} SET status = ?1, started_at = COALESCE(started_at, ?2), updated_at = ?3 WHERE id = ?4 AND status = ?5",
                    subject.table()
                );
                tx.execute(
                    &update_sql,
                    params![target.as_str(), &now_str, &now_str, id as i64, &status_str],
                )
                .db_context("Failed to start subject")?
            }
            TransitionKind::Complete => match subject {
                Subject::Stage => {
                    let duration_secs = started_at_str
                        .as_deref()
                        .and_then(|s| s.parse::<Timestamp>().ok())
                        .map(|started| now.as_second() - started.as_second());
                    let update_sql = "UPDATE stages SET status = ?1, finished_at = ?2, actual_duration_secs = ?3, updated_at = ?4 WHERE id = ?5 AND status = ?6";
                    tx.execute(
                        update_sql,
                        params![
                            target.as_str(),
                            &now_str,
                            duration_secs,
                            &now_str,
                            id as i64,
                            &status_str
                        ],
                    )
                    .db_context("Failed to complete stage")?
                }
                Subject::Task => {
                    let update_sql = "UPDATE tasks SET status = ?1, finished_at = ?2, updated_at = ?3 WHERE id = ?4 AND status = ?5";
                    tx.execute(
                        update_sql,
                        params![target.as_str(), &now_str, &now_str, id as i64, &status_str],
                    )
                    .db_context("Failed to complete task")?
                }
            },
            TransitionKind::Pause | TransitionKind::FlagProblem | TransitionKind::Cancel => {
                let update_sql = format!(
                    "UPDATE {} SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
                    subject.table()
                );
                tx.execute(
                    &update_sql,
                    params![target.as_str(), &now_str, id as i64, &status_str],
                )
                .db_context("Failed to update status")?
            }
        };

        if rows == 0 {
            return Err(EngineError::ConcurrencyConflict {
                operation: format!("{} {}", kind.verb(), subject.label()),
            });
        }

        record_transition_on(
            &tx,
            subject,
            id,
            kind.event(current),
            current,
            target,
            actor,
            note,
            &now_str,
        )?;

        // Bump the owning plan so list views reflect floor activity
        let bump_sql = match subject {
            Subject::Stage => {
                "UPDATE plans SET updated_at = ?1 WHERE id = (SELECT plan_id FROM stages WHERE id = ?2)"
            }
            Subject::Task => {
                "UPDATE stages SET updated_at = ?1 WHERE id = (SELECT stage_id FROM tasks WHERE id = ?2)"
            }
        };
        tx.execute(bump_sql, params![&now_str, id as i64])
            .db_context("Failed to update parent timestamp")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }
}
