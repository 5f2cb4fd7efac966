use super::{client, report};
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::messages::Message;
use crate::libs::task::{parse_deadline, Task};
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_info, msg_success};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct IdArgs {
    #[arg(required = true)]
    id: i64,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(required = true)]
    description: String,
    /// Visible to others instead of private
    #[arg(long)]
    shared: bool,
    #[arg(short, long)]
    important: bool,
    #[arg(short, long)]
    project: Option<String>,
    /// YYYY-MM-DD, YYYY-MM-DD HH:MM or RFC 3339; times without offset are UTC
    #[arg(short, long)]
    deadline: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(required = true)]
    id: i64,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    private: Option<bool>,
    #[arg(long)]
    important: Option<bool>,
    #[arg(long)]
    completed: Option<bool>,
    #[arg(long, conflicts_with = "no_project")]
    project: Option<String>,
    /// Remove the task from its project
    #[arg(long)]
    no_project: bool,
    #[arg(long, conflicts_with = "no_deadline")]
    deadline: Option<String>,
    /// Remove the deadline
    #[arg(long)]
    no_deadline: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[arg(required = true)]
    id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn show(args: IdArgs) -> Result<()> {
    let task = client()?.get_task(args.id).await.map_err(report)?;
    View::task(&task, SystemClock.now());

    Ok(())
}

pub async fn add(args: AddArgs) -> Result<()> {
    let mut task = Task::new(&args.description);
    task.private_task = !args.shared;
    task.important = args.important;
    task.project = args.project;
    task.deadline = args.deadline.as_deref().map(deadline).transpose()?;

    let id = client()?.add_task(&task).await.map_err(report)?;
    msg_success!(Message::TaskCreated(id));

    Ok(())
}

/// Loads the task, applies the given changes and sends the full task back.
pub async fn edit(args: EditArgs) -> Result<()> {
    let client = client()?;
    let mut task = client.get_task(args.id).await.map_err(report)?;

    if let Some(description) = args.description {
        task.description = description;
    }
    if let Some(private) = args.private {
        task.private_task = private;
    }
    if let Some(important) = args.important {
        task.important = important;
    }
    if let Some(completed) = args.completed {
        task.completed = completed;
    }
    if args.no_project {
        task.project = None;
    } else if let Some(project) = args.project {
        task.project = Some(project);
    }
    if args.no_deadline {
        task.deadline = None;
    } else if let Some(text) = args.deadline.as_deref() {
        task.deadline = Some(deadline(text)?);
    }

    client.update_task(&task).await.map_err(report)?;
    msg_success!(Message::TaskUpdated(args.id));

    Ok(())
}

pub async fn complete(args: IdArgs) -> Result<()> {
    client()?.set_completed(args.id).await.map_err(report)?;
    msg_success!(Message::TaskCompleted(args.id));

    Ok(())
}

pub async fn delete(args: DeleteArgs) -> Result<()> {
    let client = client()?;

    if !args.yes {
        let task = client.get_task(args.id).await.map_err(report)?;
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteTask(task.description).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    client.delete_task(args.id).await.map_err(report)?;
    msg_success!(Message::TaskDeleted(args.id));

    Ok(())
}

fn deadline(text: &str) -> Result<DateTime<Utc>> {
    match parse_deadline(text) {
        Some(deadline) => Ok(deadline),
        None => msg_bail_anyhow!(Message::InvalidDeadline(text.to_string())),
    }
}
