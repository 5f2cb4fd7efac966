use super::{client, report};
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::filter::FilterKey;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print, msg_warning};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// One of private, shared, important, today, week
    #[arg(short, long)]
    filter: Option<String>,
    /// Only tasks of this project
    #[arg(short, long, conflicts_with = "filter")]
    project: Option<String>,
    /// Let the server apply the filter instead of filtering locally
    #[arg(long, requires = "filter")]
    remote: bool,
}

pub async fn cmd(args: ListArgs) -> Result<()> {
    let client = client()?;
    let key = args.filter.as_deref().and_then(FilterKey::parse);
    if let (Some(name), None) = (&args.filter, key) {
        msg_warning!(Message::UnknownFilter(name.clone()));
    }

    let (title, tasks) = match (key, &args.project) {
        (Some(key), _) if args.remote => (key.title().to_string(), client.fetch_filtered(key).await.map_err(report)?),
        (Some(key), _) => {
            client.fetch_tasks().await.map_err(report)?;
            (key.title().to_string(), client.filtered(key))
        }
        (None, Some(project)) => {
            client.fetch_tasks().await.map_err(report)?;
            (project.clone(), client.by_project(project))
        }
        (None, None) => ("All".to_string(), client.fetch_tasks().await.map_err(report)?),
    };

    msg_print!(Message::TasksHeader(title), true);
    if tasks.is_empty() {
        msg_info!(Message::TasksNotFound);
    } else {
        View::tasks(&tasks, SystemClock.now());
    }

    Ok(())
}

pub async fn projects() -> Result<()> {
    let client = client()?;
    client.fetch_tasks().await.map_err(report)?;

    let projects = client.projects();
    msg_print!(Message::ProjectsHeader, true);
    if projects.is_empty() {
        msg_info!(Message::ProjectsNotFound);
    } else {
        View::projects(&projects);
    }

    Ok(())
}
