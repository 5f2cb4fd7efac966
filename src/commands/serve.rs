use crate::api::server;
use crate::db::{db::Db, tasks::Tasks};
use crate::libs::clock::SystemClock;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::msg_success;
use anyhow::Result;
use clap::Args;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind, overrides the configured host
    #[arg(long)]
    host: Option<String>,
    /// Port to bind, overrides the configured port
    #[arg(short, long)]
    port: Option<u16>,
    /// SQLite file, overrides the configured database
    #[arg(long)]
    db: Option<String>,
}

pub async fn cmd(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?.server;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(db) = args.db {
        config.database = Some(db);
    }

    let db_path = config.database_path()?;
    let tasks = Tasks::new(Db::open(&db_path)?, Arc::new(SystemClock));
    tracing::info!(path = %db_path.display(), "{}", Message::DatabaseOpened(db_path.display().to_string()));

    let handle = server::start(&config.bind_address(), tasks).await?;
    msg_success!(Message::ServerStarted(handle.addr.to_string()));

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await?;

    Ok(())
}
