//! Append-only status log.
//!
//! Log rows are written exclusively by the transition executor, inside
//! the transaction that performs the status write. Nothing updates or
//! deletes them; they only disappear with their subject (cascade).

use rusqlite::{params, Connection};

use crate::{
    db::transitions::Subject,
    error::{DatabaseResultExt, Result},
    models::{LogEvent, StatusLogEntry, WorkStatus},
};

/// Appends one immutable transition record inside the caller's
/// transaction.
#[allow(clippy::too_many_arguments)]
pub(crate) fn record_transition_on(
    conn: &Connection,
    subject: Subject,
    subject_id: u64,
    event: LogEvent,
    before: WorkStatus,
    after: WorkStatus,
    actor: &str,
    note: Option<&str>,
    logged_at: &str,
) -> Result<()> {
    let insert_sql = format!(
        "INSERT INTO {} ({}, event, before_status, after_status, actor, note, logged_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        subject.log_table(),
        subject.log_fk()
    );

    conn.execute(
        &insert_sql,
        params![
            subject_id as i64,
            event.as_str(),
            before.as_str(),
            after.as_str(),
            actor,
            note,
            logged_at
        ],
    )
    .db_context("Failed to append status log entry")?;

    Ok(())
}

fn build_entry_from_row(row: &rusqlite::Row) -> rusqlite::Result<StatusLogEntry> {
    let event: String = row.get(2)?;
    let before: String = row.get(3)?;
    let after: String = row.get(4)?;

    Ok(StatusLogEntry {
        id: row.get::<_, i64>(0)? as u64,
        subject_id: row.get::<_, i64>(1)? as u64,
        event: super::parse_enum(2, &event)?,
        before_status: super::parse_enum(3, &before)?,
        after_status: super::parse_enum(4, &after)?,
        actor: row.get(5)?,
        note: row.get(6)?,
        logged_at: super::parse_timestamp(7, row.get(7)?)?,
    })
}

impl super::Database {
    /// Retrieves a subject's full status history in insertion order.
    ///
    /// Replaying the entries reconstructs the subject's status history
    /// exactly; its current status equals the last entry's after_status.
    pub fn get_history(&self, subject: Subject, subject_id: u64) -> Result<Vec<StatusLogEntry>> {
        let query = format!(
            "SELECT id, {}, event, before_status, after_status, actor, note, logged_at FROM {} WHERE {} = ?1 ORDER BY id",
            subject.log_fk(),
            subject.log_table(),
            subject.log_fk()
        );

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let entries = stmt
            .query_map(params![subject_id as i64], build_entry_from_row)
            .db_context("Failed to query status history")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch status history")?;

        Ok(entries)
    }
}
