//! The task entity and its two external shapes.
//!
//! A [`Task`] never leaves this module in any representation other than the
//! native one. The stored row (integer flags, `NULL` columns, SQLite datetime
//! text) and the wire shape (camelCase JSON, RFC 3339 timestamps) are both
//! converted here and nowhere else.
//!
//! ## Usage
//!
//! ```rust
//! use tasklist::libs::task::{Task, TaskWire};
//!
//! let task = Task::new("Buy milk").with_project("home");
//! let wire = TaskWire::from(&task);
//! assert_eq!(Task::from_wire(wire)?, task);
//! # Ok::<(), tasklist::libs::error::TaskError>(())
//! ```

use super::error::{FieldError, TaskError};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// Text layout produced by SQLite's `DATETIME()` and accepted back by it.
pub const STORAGE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Layouts accepted for a deadline on input, besides RFC 3339.
const INPUT_DATETIME_FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Option<i64>,
    pub description: String,
    pub private_task: bool,
    pub important: bool,
    pub project: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl Task {
    /// A private, unimportant, open task with no project and no deadline.
    pub fn new(description: &str) -> Self {
        Task {
            id: None,
            description: description.to_string(),
            private_task: true,
            important: false,
            project: None,
            deadline: None,
            completed: false,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn shared(mut self) -> Self {
        self.private_task = false;
        self
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    pub fn with_project(mut self, project: &str) -> Self {
        self.project = Some(project.to_string());
        self
    }

    /// Deadlines are kept at second precision, which is what both the
    /// storage and the wire format carry.
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline.trunc_subsecs(0));
        self
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|d| d < now)
    }

    /// Ordered parameters for `description, privateTask, important,
    /// projectName, deadline, completed`.
    pub fn to_params(&self) -> Vec<Value> {
        vec![
            Value::Text(self.description.clone()),
            encode_flag(self.private_task),
            encode_flag(self.important),
            self.project.clone().map_or(Value::Null, Value::Text),
            self.deadline.map_or(Value::Null, |d| Value::Text(format_storage_deadline(&d))),
            encode_flag(self.completed),
        ]
    }

    pub fn from_row(row: StoredRow) -> Result<Task, TaskError> {
        Task::try_from(row)
    }

    /// Builds a task from its wire shape. An absent or blank deadline or
    /// project means "none"; any other deadline must parse.
    pub fn from_wire(wire: TaskWire) -> Result<Task, TaskError> {
        let deadline = match wire.deadline.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(parse_deadline(text).ok_or_else(|| {
                TaskError::Validation(vec![FieldError::new(
                    "deadline",
                    format!("Unreadable deadline '{}'", text),
                )])
            })?),
        };

        Ok(Task {
            id: wire.id,
            description: wire.description,
            private_task: wire.private_task,
            important: wire.important,
            project: wire.project.filter(|p| !p.trim().is_empty()),
            deadline,
            completed: wire.completed,
        })
    }

    pub fn to_wire(&self) -> TaskWire {
        TaskWire::from(self)
    }
}

/// A `Task` table row exactly as SQLite hands it back, before any decoding.
#[derive(Debug, Clone, Default)]
pub struct StoredRow {
    pub task_id: i64,
    pub description: Option<String>,
    pub private_task: Option<i64>,
    pub important: Option<i64>,
    pub project_name: Option<String>,
    pub deadline: Option<String>,
    pub completed: Option<i64>,
}

impl StoredRow {
    pub fn read(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
        Ok(StoredRow {
            task_id: row.get("taskId")?,
            description: row.get("description")?,
            private_task: row.get("privateTask")?,
            important: row.get("important")?,
            project_name: row.get("projectName")?,
            deadline: row.get("deadline")?,
            completed: row.get("completed")?,
        })
    }
}

impl TryFrom<StoredRow> for Task {
    type Error = TaskError;

    fn try_from(row: StoredRow) -> Result<Self, Self::Error> {
        let description = row
            .description
            .ok_or_else(|| TaskError::MalformedRow(format!("task {} has no description", row.task_id)))?;
        let deadline = match row.deadline {
            Some(text) => Some(parse_storage_deadline(&text).ok_or_else(|| {
                TaskError::MalformedRow(format!("task {} has unreadable deadline '{}'", row.task_id, text))
            })?),
            None => None,
        };

        Ok(Task {
            id: Some(row.task_id),
            description,
            private_task: decode_flag(row.private_task, true),
            important: decode_flag(row.important, false),
            project: row.project_name,
            deadline,
            completed: decode_flag(row.completed, false),
        })
    }
}

/// JSON shape exchanged between server and client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub description: String,
    #[serde(default = "default_private")]
    pub private_task: bool,
    #[serde(default)]
    pub important: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl From<&Task> for TaskWire {
    fn from(task: &Task) -> Self {
        TaskWire {
            id: task.id,
            description: task.description.clone(),
            private_task: task.private_task,
            important: task.important,
            project: task.project.clone(),
            deadline: task.deadline.as_ref().map(format_wire_deadline),
            completed: task.completed,
        }
    }
}

/// Body returned by `POST /api/tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: i64,
}

fn default_private() -> bool {
    true
}

fn encode_flag(flag: bool) -> Value {
    Value::Integer(if flag { 1 } else { 0 })
}

fn decode_flag(value: Option<i64>, default: bool) -> bool {
    value.map_or(default, |v| v != 0)
}

/// Canonical wire form: RFC 3339 in UTC with whole seconds, `2026-10-19T14:30:00Z`.
pub fn format_wire_deadline(deadline: &DateTime<Utc>) -> String {
    deadline.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn format_storage_deadline(deadline: &DateTime<Utc>) -> String {
    deadline.format(STORAGE_DATETIME_FORMAT).to_string()
}

fn parse_storage_deadline(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, STORAGE_DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
        .or_else(|| parse_deadline(text))
}

/// Parses a deadline given on input. Timestamps without an offset are read
/// as UTC; a bare date means midnight UTC of that day. Years outside
/// 0000-9999 are refused because SQLite's `DATETIME()` turns them into NULL.
pub fn parse_deadline(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_any_layout(text).filter(|deadline| (0..=9999).contains(&deadline.year()))
}

fn parse_any_layout(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).trunc_subsecs(0));
    }
    for format in INPUT_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
