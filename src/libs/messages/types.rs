#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(i64),
    TaskUpdated(i64),
    TaskCompleted(i64),
    TaskDeleted(i64),
    TaskNotFound(i64),
    TasksNotFound,
    TasksHeader(String), // filter title
    ProjectsHeader,
    ProjectsNotFound,
    ConfirmDeleteTask(String), // description
    OperationCancelled,

    // === INPUT MESSAGES ===
    ValidationFailed(String),
    InvalidDeadline(String),
    UnknownFilter(String),

    // === SERVER MESSAGES ===
    ServerStarted(String),   // address
    DatabaseOpened(String),  // path
    ServerError,
    RequestFailed(String), // reason
    PersistenceFailed(&'static str, String), // operation, error
    MalformedRow(String),

    // === CLIENT MESSAGES ===
    NetworkError(String),
    FetchSuperseded(u64), // generation
    CacheRefreshed(usize),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved(String), // path

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseUpToDate,
}
