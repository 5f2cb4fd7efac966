//! Task repository: the server's only path to the `Task` table.
//!
//! Every operation is a single statement, so statement-level atomicity from
//! SQLite is all the coordination needed. Calls are async for the caller; the
//! blocking SQLite work runs on tokio's blocking pool.
//!
//! A missing row is an ordinary outcome here. Lookups return `Option`, writes
//! return [`WriteOutcome`], and deleting a missing row succeeds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tasklist::db::{db::Db, tasks::Tasks};
//! use tasklist::libs::{clock::SystemClock, task::Task};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let tasks = Tasks::new(Db::in_memory()?, Arc::new(SystemClock));
//! let id = tasks.create(&Task::new("Buy milk")).await?;
//! let important = tasks.list(Some("important")).await?;
//! # Ok(())
//! # }
//! ```

use super::db::Db;
use crate::libs::clock::Clock;
use crate::libs::error::{FieldError, TaskError, WriteOutcome};
use crate::libs::filter::filter_by_name;
use crate::libs::messages::Message;
use crate::libs::task::{StoredRow, Task};
use chrono::Datelike;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::sync::Arc;

const INSERT_TASK: &str = "INSERT INTO Task (description, privateTask, important, projectName, deadline, completed) VALUES (?1, ?2, ?3, ?4, DATETIME(?5), ?6)";
const UPDATE_TASK: &str = "UPDATE Task SET description = ?1, privateTask = ?2, important = ?3, projectName = ?4, deadline = DATETIME(?5), completed = ?6 WHERE taskId = ?7";
const SET_COMPLETED: &str = "UPDATE Task SET completed = 1 WHERE taskId = ?1";
const DELETE_TASK: &str = "DELETE FROM Task WHERE taskId = ?1";
const SELECT_TASKS: &str =
    "SELECT taskId, description, privateTask, important, projectName, deadline, completed FROM Task";
const WHERE_ID: &str = "WHERE taskId = ?1";
const ORDER_BY_ID: &str = "ORDER BY taskId";

#[derive(Clone)]
pub struct Tasks {
    db: Db,
    clock: Arc<dyn Clock>,
}

impl Tasks {
    pub fn new(db: Db, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Inserts the task and returns the id SQLite assigned. Any `id` already
    /// on `task` is ignored.
    pub async fn create(&self, task: &Task) -> Result<i64, TaskError> {
        storable(task)?;
        let params = task.to_params();
        self.run("create", move |conn| {
            conn.execute(INSERT_TASK, params_from_iter(params))?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Task>, TaskError> {
        self.run("get_by_id", move |conn| {
            let row = conn
                .query_row(&format!("{} {}", SELECT_TASKS, WHERE_ID), params![id], StoredRow::read)
                .optional()?;
            row.map(Task::from_row).transpose()
        })
        .await
    }

    /// Loads every task, then narrows the list when `filter` names one of the
    /// five views. Any other value leaves the list unfiltered.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<Task>, TaskError> {
        let tasks = self
            .run("list", |conn| {
                let mut stmt = conn.prepare(&format!("{} {}", SELECT_TASKS, ORDER_BY_ID))?;
                let rows = stmt.query_map([], StoredRow::read)?;

                let mut tasks = Vec::new();
                for row in rows {
                    tasks.push(Task::from_row(row?)?);
                }
                Ok(tasks)
            })
            .await?;

        Ok(filter_by_name(tasks, filter, self.clock.now()))
    }

    /// Replaces every mutable field of task `id`.
    pub async fn update(&self, id: i64, task: &Task) -> Result<WriteOutcome, TaskError> {
        storable(task)?;
        let mut params = task.to_params();
        params.push(id.into());
        self.run("update", move |conn| {
            let affected = conn.execute(UPDATE_TASK, params_from_iter(params))?;
            Ok(outcome(affected))
        })
        .await
    }

    /// Marks task `id` as completed. There is no way back to "open" through
    /// this call; repeating it is harmless.
    pub async fn set_completed(&self, id: i64) -> Result<WriteOutcome, TaskError> {
        self.run("set_completed", move |conn| {
            let affected = conn.execute(SET_COMPLETED, params![id])?;
            Ok(outcome(affected))
        })
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), TaskError> {
        self.run("delete", move |conn| {
            conn.execute(DELETE_TASK, params![id])?;
            Ok(())
        })
        .await
    }

    async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T, TaskError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, TaskError> + Send + 'static,
    {
        let db = self.db.clone();
        let result = tokio::task::spawn_blocking(move || db.with_conn(f))
            .await
            .unwrap_or_else(|e| Err(TaskError::Persistence(format!("storage worker failed: {}", e))));

        match &result {
            Err(TaskError::MalformedRow(details)) => {
                tracing::error!(operation, "{}", Message::MalformedRow(details.clone()))
            }
            Err(e) => tracing::error!(operation, "{}", Message::PersistenceFailed(operation, e.to_string())),
            Ok(_) => {}
        }
        result
    }
}

/// `DATETIME()` yields NULL outside years 0000-9999, which would drop the
/// deadline without an error.
fn storable(task: &Task) -> Result<(), TaskError> {
    match task.deadline {
        Some(deadline) if !(0..=9999).contains(&deadline.year()) => Err(TaskError::Validation(vec![FieldError::new(
            "deadline",
            format!("Year {} cannot be stored", deadline.year()),
        )])),
        _ => Ok(()),
    }
}

fn outcome(affected: usize) -> WriteOutcome {
    if affected == 0 {
        WriteOutcome::NotFound
    } else {
        WriteOutcome::Applied
    }
}
