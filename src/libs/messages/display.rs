//! Human-readable text for every [`Message`].
//!
//! All user-facing wording lives in this one match so the CLI, the server log
//! and error values stay consistent.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(id) => format!("Task {} created", id),
            Message::TaskUpdated(id) => format!("Task {} updated", id),
            Message::TaskCompleted(id) => format!("Task {} marked as completed", id),
            Message::TaskDeleted(id) => format!("Task {} deleted", id),
            Message::TaskNotFound(id) => format!("Task {} not found", id),
            Message::TasksNotFound => "No tasks found".to_string(),
            Message::TasksHeader(title) => format!("Tasks: {}", title),
            Message::ProjectsHeader => "Projects:".to_string(),
            Message::ProjectsNotFound => "No projects yet".to_string(),
            Message::ConfirmDeleteTask(description) => format!("Delete task '{}'?", description),
            Message::OperationCancelled => "Operation cancelled".to_string(),

            // === INPUT MESSAGES ===
            Message::ValidationFailed(details) => format!("Invalid task: {}", details),
            Message::InvalidDeadline(value) => format!(
                "Cannot read deadline '{}'. Use YYYY-MM-DD, YYYY-MM-DD HH:MM or RFC 3339",
                value
            ),
            Message::UnknownFilter(key) => format!(
                "Unknown filter '{}', showing all tasks (expected private, shared, important, today or week)",
                key
            ),

            // === SERVER MESSAGES ===
            Message::ServerStarted(addr) => format!("Server ready at http://{}", addr),
            Message::DatabaseOpened(path) => format!("Database opened: {}", path),
            Message::ServerError => "Internal server error".to_string(),
            Message::RequestFailed(reason) => format!("Request failed: {}", reason),
            Message::PersistenceFailed(operation, error) => format!("Storage failure in {}: {}", operation, error),
            Message::MalformedRow(details) => format!("Stored task is corrupt: {}", details),

            // === CLIENT MESSAGES ===
            Message::NetworkError(reason) => format!("Cannot reach the server ({}), please retry", reason),
            Message::FetchSuperseded(generation) => {
                format!("Discarding task list from fetch #{}: a newer fetch was issued", generation)
            }
            Message::CacheRefreshed(count) => format!("Task cache refreshed with {} tasks", count),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
        };

        write!(f, "{}", text)
    }
}
