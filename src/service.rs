//! Task service: validation and normalization wrapping the calculator and
//! the store.
//!
//! Each operation takes `today` explicitly so callers (and tests) control
//! the reference day; nothing here reads the wall clock.

use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::nextdate::{self, DATE_FORMAT};
use crate::types::{Task, TaskPayload};
use chrono::NaiveDate;
use tracing::debug;

/// Cap on the upcoming-list result size.
pub const UPCOMING_LIMIT: i64 = 50;

/// Stateless service over a shared database handle.
#[derive(Clone)]
pub struct TaskService {
    db: Database,
}

impl TaskService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Validate title/date/repeat and return the normalized due date.
    ///
    /// The date defaults to `today` when empty. A non-empty repeat rule is
    /// validated by running the calculator once. A past date is clamped to
    /// `today` for one-time tasks, or advanced to the rule's next occurrence
    /// computed from `today` for repeating ones.
    fn normalize(
        &self,
        payload: &TaskPayload,
        today: NaiveDate,
    ) -> ApiResult<(String, String)> {
        let title = payload.title.trim();
        if title.is_empty() {
            return Err(ApiError::missing_title());
        }

        let mut date = if payload.date.trim().is_empty() {
            today.format(DATE_FORMAT).to_string()
        } else {
            payload.date.trim().to_string()
        };
        let parsed = NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .map_err(|_| ApiError::invalid_date_format(&date))?;

        if payload.repeat.is_empty() {
            if parsed < today {
                date = today.format(DATE_FORMAT).to_string();
            }
        } else {
            let next = nextdate::next_date(today, &date, &payload.repeat)
                .map_err(ApiError::invalid_repeat_rule)?;
            if parsed < today {
                date = next;
            }
        }

        Ok((date, title.to_string()))
    }

    /// Create a task and return its assigned id.
    pub fn create(&self, payload: &TaskPayload, today: NaiveDate) -> ApiResult<i64> {
        let (date, title) = self.normalize(payload, today)?;
        let id = self
            .db
            .add_task(&date, &title, &payload.comment, &payload.repeat)?;
        debug!(id, %date, "task created");
        Ok(id)
    }

    /// Fetch a task by id.
    pub fn get(&self, id: i64) -> ApiResult<Task> {
        require_positive(id)?;
        self.db
            .get_task(id)?
            .ok_or_else(|| ApiError::task_not_found(id))
    }

    /// List tasks due today or later, soonest first, capped at
    /// [`UPCOMING_LIMIT`].
    pub fn list_upcoming(&self, today: NaiveDate) -> ApiResult<Vec<Task>> {
        let from = today.format(DATE_FORMAT).to_string();
        Ok(self.db.list_upcoming(&from, UPCOMING_LIMIT)?)
    }

    /// Replace all mutable fields of an existing task.
    pub fn update(&self, payload: &TaskPayload, today: NaiveDate) -> ApiResult<Task> {
        let id = payload.id.ok_or_else(ApiError::missing_id)?;
        require_positive(id)?;
        let (date, title) = self.normalize(payload, today)?;
        let task = Task {
            id,
            date,
            title,
            comment: payload.comment.clone(),
            repeat: payload.repeat.clone(),
        };
        if !self.db.update_task(&task)? {
            return Err(ApiError::task_not_found(id));
        }
        Ok(task)
    }

    /// Delete a task.
    pub fn delete(&self, id: i64) -> ApiResult<()> {
        require_positive(id)?;
        if !self.db.delete_task(id)? {
            return Err(ApiError::task_not_found(id));
        }
        Ok(())
    }

    /// Mark a task done: one-time tasks are deleted, repeating tasks are
    /// rescheduled to the next occurrence after `today`.
    pub fn complete(&self, id: i64, today: NaiveDate) -> ApiResult<()> {
        let task = self.get(id)?;
        if task.repeat.is_empty() {
            self.db.delete_task(id)?;
            debug!(id, "one-time task completed and removed");
        } else {
            let next = nextdate::next_date(today, &task.date, &task.repeat)
                .map_err(ApiError::invalid_repeat_rule)?;
            if !self.db.update_task_date(id, &next)? {
                // Deleted out from under us between the read and the write.
                return Err(ApiError::task_not_found(id));
            }
            debug!(id, %next, "repeating task rescheduled");
        }
        Ok(())
    }
}

fn require_positive(id: i64) -> ApiResult<()> {
    if id <= 0 {
        return Err(ApiError::invalid_id(&id.to_string()));
    }
    Ok(())
}
