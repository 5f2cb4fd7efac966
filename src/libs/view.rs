use super::task::Task;
use chrono::{DateTime, Local, Utc};
use prettytable::{row, Table};

/// Terminal rendering of tasks. Deadlines are shown in local time; everything
/// upstream of this works in UTC.
pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task], now: DateTime<Utc>) {
        let mut table = Table::new();

        table.add_row(row!["ID", "", "DESCRIPTION", "PROJECT", "DEADLINE", "SHARED"]);
        for task in tasks {
            let done = if task.completed { "[x]" } else { "[ ]" };
            let shared = if task.private_task { "" } else { "yes" };
            let project = task.project.as_deref().unwrap_or("");
            table.add_row(row![
                task.id.unwrap_or(0),
                done,
                Self::description(task),
                project,
                Self::deadline(task, now),
                shared
            ]);
        }
        table.printstd();
    }

    pub fn task(task: &Task, now: DateTime<Utc>) {
        let mut table = Table::new();
        let project = task.project.as_deref().unwrap_or("-");

        table.add_row(row!["ID", task.id.unwrap_or(0)]);
        table.add_row(row!["DESCRIPTION", task.description]);
        table.add_row(row!["PRIVATE", task.private_task]);
        table.add_row(row!["IMPORTANT", task.important]);
        table.add_row(row!["PROJECT", project]);
        table.add_row(row!["DEADLINE", Self::deadline(task, now)]);
        table.add_row(row!["COMPLETED", task.completed]);
        table.printstd();
    }

    pub fn projects(projects: &[String]) {
        let mut table = Table::new();

        table.add_row(row!["PROJECT"]);
        for project in projects {
            table.add_row(row![project]);
        }
        table.printstd();
    }

    fn description(task: &Task) -> String {
        if task.important {
            format!("!!! {}", task.description)
        } else {
            task.description.clone()
        }
    }

    fn deadline(task: &Task, now: DateTime<Utc>) -> String {
        match task.deadline {
            Some(deadline) => {
                let text = format_local(&deadline);
                if task.is_overdue(now) {
                    format!("{} (overdue)", text)
                } else {
                    text
                }
            }
            None => String::new(),
        }
    }
}

/// `Monday, October 19 2026, 2:30:00 pm` in the machine's time zone.
pub fn format_local(deadline: &DateTime<Utc>) -> String {
    deadline.with_timezone(&Local).format("%A, %B %-d %Y, %-I:%M:%S %P").to_string()
}
