//! SQLite persistence layer.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use tasklist::db::{db::Db, tasks::Tasks};
//! use tasklist::libs::clock::SystemClock;
//!
//! let db = Db::in_memory()?;
//! let tasks = Tasks::new(db, Arc::new(SystemClock));
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Shared connection handle; opening it applies pending migrations.
pub mod db;

/// Versioned schema changes, tracked in the `migrations` table.
pub mod migrations;

/// The task repository: create, read, update, complete and delete.
pub mod tasks;
