//! HTTP surface of tasklist: the REST server and the client store that talks
//! to it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tasklist::api::{client::TaskClient, server};
//! use tasklist::db::{db::Db, tasks::Tasks};
//! use tasklist::libs::{clock::SystemClock, config::ClientConfig};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let tasks = Tasks::new(Db::in_memory()?, Arc::new(SystemClock));
//! let handle = server::start("127.0.0.1:0", tasks).await?;
//!
//! let client = TaskClient::new(&ClientConfig {
//!     base_url: handle.base_url(),
//!     ..ClientConfig::default()
//! })?;
//! client.fetch_tasks().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod server;
pub mod validation;
