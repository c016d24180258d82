//! SQL operations on the `scheduler` table.

use super::Database;
use crate::types::Task;
use anyhow::Result;
use rusqlite::{Row, params};

fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        date: row.get("date")?,
        title: row.get("title")?,
        comment: row.get("comment")?,
        repeat: row.get("repeat")?,
    })
}

impl Database {
    /// Insert a new task and return its assigned id.
    pub fn add_task(&self, date: &str, title: &str, comment: &str, repeat: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO scheduler (date, title, comment, repeat) VALUES (?1, ?2, ?3, ?4)",
                params![date, title, comment, repeat],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Fetch a single task by id.
    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, date, title, comment, repeat FROM scheduler WHERE id = ?1",
            )?;
            match stmt.query_row(params![id], parse_task_row) {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// List tasks due on or after `from`, soonest first, capped at `limit`.
    pub fn list_upcoming(&self, from: &str, limit: i64) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, date, title, comment, repeat FROM scheduler
                 WHERE date >= ?1 ORDER BY date LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![from, limit], parse_task_row)?;
            let mut tasks = Vec::new();
            for row in rows {
                tasks.push(row?);
            }
            Ok(tasks)
        })
    }

    /// Replace all mutable fields of a task. Returns false when no row matched.
    pub fn update_task(&self, task: &Task) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE scheduler SET date = ?1, title = ?2, comment = ?3, repeat = ?4
                 WHERE id = ?5",
                params![task.date, task.title, task.comment, task.repeat, task.id],
            )?;
            Ok(changed > 0)
        })
    }

    /// Advance only the due date of a task. Returns false when no row matched.
    pub fn update_task_date(&self, id: i64, date: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE scheduler SET date = ?1 WHERE id = ?2",
                params![date, id],
            )?;
            Ok(changed > 0)
        })
    }

    /// Delete a task. Returns false when no row matched.
    pub fn delete_task(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM scheduler WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
    }
}
