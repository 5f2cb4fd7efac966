pub mod init;
pub mod list;
pub mod serve;
pub mod task;

use crate::api::client::TaskClient;
use crate::libs::config::Config;
use crate::libs::error::TaskError;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Write the effective configuration to disk")]
    Init,
    #[command(about = "Run the REST server")]
    Serve(serve::ServeArgs),
    #[command(about = "List tasks, optionally through a filter or project")]
    List(list::ListArgs),
    #[command(about = "List project names")]
    Projects,
    #[command(about = "Show one task")]
    Show(task::IdArgs),
    #[command(about = "Create task")]
    Add(task::AddArgs),
    #[command(about = "Replace the fields of a task")]
    Edit(task::EditArgs),
    #[command(about = "Mark a task as completed")]
    Complete(task::IdArgs),
    #[command(about = "Delete a task")]
    Delete(task::DeleteArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init => init::cmd(),
            Commands::Serve(args) => serve::cmd(args).await,
            Commands::List(args) => list::cmd(args).await,
            Commands::Projects => list::projects().await,
            Commands::Show(args) => task::show(args).await,
            Commands::Add(args) => task::add(args).await,
            Commands::Edit(args) => task::edit(args).await,
            Commands::Complete(args) => task::complete(args).await,
            Commands::Delete(args) => task::delete(args).await,
        }
    }
}

/// Client store built from the loaded configuration.
pub(crate) fn client() -> Result<TaskClient> {
    let config = Config::load()?;
    TaskClient::new(&config.client).map_err(report)
}

/// Converts a client-side failure into the message shown to the user.
pub(crate) fn report(error: TaskError) -> anyhow::Error {
    match error {
        TaskError::NotFound(id) => msg_error_anyhow!(Message::TaskNotFound(id)),
        TaskError::Validation(ref fields) => {
            let details = fields.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(", ");
            msg_error_anyhow!(Message::ValidationFailed(details))
        }
        TaskError::Network(reason) => msg_error_anyhow!(Message::NetworkError(reason)),
        other => msg_error_anyhow!(Message::RequestFailed(other.to_string())),
    }
}
