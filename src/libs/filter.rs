//! Derived views over a task collection.
//!
//! This is the only place the filter predicates live. The repository applies
//! them to freshly loaded rows; the client store applies them to its cached
//! list. Every function here is pure: the caller supplies "now", so the
//! date-relative views are reproducible.
//!
//! All date comparisons are made in UTC. Turning a deadline into local time is
//! left to the presentation layer.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use tasklist::libs::filter::{filter, FilterKey};
//! use tasklist::libs::task::Task;
//!
//! let tasks = vec![Task::new("Buy milk").important(), Task::new("Call mom")];
//! let important = filter(&tasks, FilterKey::Important, Utc::now());
//! assert_eq!(important.len(), 1);
//! ```

use super::task::Task;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Private,
    Shared,
    Important,
    Today,
    Week,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        FilterKey::Private,
        FilterKey::Shared,
        FilterKey::Important,
        FilterKey::Today,
        FilterKey::Week,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Private => "private",
            FilterKey::Shared => "shared",
            FilterKey::Important => "important",
            FilterKey::Today => "today",
            FilterKey::Week => "week",
        }
    }

    /// Heading shown above a filtered list.
    pub fn title(&self) -> &'static str {
        match self {
            FilterKey::Private => "Private",
            FilterKey::Shared => "Shared with...",
            FilterKey::Important => "Important",
            FilterKey::Today => "Today",
            FilterKey::Week => "Next 7 days",
        }
    }

    /// `None` for anything that is not one of the five keys. Callers treat
    /// that as "no filter" rather than as an error.
    pub fn parse(key: &str) -> Option<FilterKey> {
        key.parse().ok()
    }

    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        match self {
            FilterKey::Private => task.private_task,
            FilterKey::Shared => !task.private_task,
            FilterKey::Important => task.important,
            FilterKey::Today => task.deadline.is_some_and(|d| is_today(d, now)),
            FilterKey::Week => task.deadline.is_some_and(|d| is_next_week(d, now)),
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl fmt::Display for UnknownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown filter '{}'", self.0)
    }
}

impl std::error::Error for UnknownFilter {}

impl FromStr for FilterKey {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// Same UTC calendar day as `now`.
pub fn is_today(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    deadline.date_naive() == now.date_naive()
}

/// Strictly after "tomorrow" (now + 1 day) and strictly before now + 7 days.
pub fn is_next_week(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let tomorrow = now + Duration::days(1);
    let next_week = now + Duration::weeks(1);
    deadline > tomorrow && deadline < next_week
}

/// Stable filter: output keeps the input's relative order, input untouched.
pub fn filter(tasks: &[Task], key: FilterKey, now: DateTime<Utc>) -> Vec<Task> {
    tasks.iter().filter(|t| key.matches(t, now)).cloned().collect()
}

/// Applies `key` when it is recognised, otherwise returns everything.
pub fn filter_by_name(tasks: Vec<Task>, key: Option<&str>, now: DateTime<Utc>) -> Vec<Task> {
    match key.and_then(FilterKey::parse) {
        Some(key) => filter(&tasks, key, now),
        None => tasks,
    }
}

/// Distinct project names, in order of first appearance.
pub fn projects(tasks: &[Task]) -> Vec<String> {
    let mut projects: Vec<String> = Vec::new();
    for project in tasks.iter().filter_map(|t| t.project.as_ref()) {
        if !projects.contains(project) {
            projects.push(project.clone());
        }
    }
    projects
}

pub fn by_project(tasks: &[Task], project: &str) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.project.as_deref() == Some(project))
        .cloned()
        .collect()
}
