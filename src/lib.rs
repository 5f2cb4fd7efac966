//! # Tasklist
//!
//! A personal task tracker: a REST API over a single SQLite table and a
//! command-line client that caches the task list and filters it locally.
//!
//! ## Features
//!
//! - **Task Repository**: create, read, update, complete and delete tasks
//! - **Filter Engine**: private, shared, important, due today, due this week
//! - **REST Server**: JSON API with field-level validation errors
//! - **Client Store**: cached task list with local re-filtering
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tasklist::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
