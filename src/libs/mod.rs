//! Core library modules for tasklist.
//!
//! ## Features
//!
//! - **Task entity**: the native task type and its row and wire mappings
//! - **Filter engine**: private, shared, important, today and week views,
//!   plus project grouping, shared by server and client
//! - **Infrastructure**: configuration, data directory, clock, errors,
//!   messaging and terminal views
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use tasklist::libs::filter::{filter, FilterKey};
//! use tasklist::libs::task::Task;
//!
//! let tasks = vec![Task::new("Buy milk"), Task::new("Plan trip").shared()];
//! assert_eq!(filter(&tasks, FilterKey::Shared, Utc::now()).len(), 1);
//! ```

pub mod clock;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod filter;
pub mod messages;
pub mod task;
pub mod view;
