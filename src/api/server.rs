//! REST server exposing the task repository.
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/api/tasks?filter=<key>` | 200, task array | 500 |
//! | GET | `/api/tasks/{id}` | 200, task | 404, 500 |
//! | POST | `/api/tasks` | 201, `{id}` | 422, 500 |
//! | PUT | `/api/tasks/{id}` | 200 | 404, 422, 500 |
//! | PATCH | `/api/tasks/{id}/completed` | 204 | 404, 500 |
//! | DELETE | `/api/tasks/{id}` | 204 | 500 |

use super::validation::validate_task;
use crate::db::tasks::Tasks;
use crate::libs::error::{FieldError, TaskError, WriteOutcome};
use crate::libs::messages::Message;
use crate::libs::task::{CreatedId, TaskWire};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Tasks,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", get(get_task).put(update_task).delete(delete_task))
        .route("/api/tasks/{id}/completed", patch(complete_task))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves in the background. Port `0` picks a free port;
/// the bound address is on the returned handle.
pub async fn start(addr: &str, tasks: Tasks) -> std::io::Result<ServerHandle> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    let router = build_router(AppState { tasks });
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tracing::info!(%local_addr, "{}", Message::ServerStarted(local_addr.to_string()));

    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    Ok(ServerHandle {
        addr: local_addr,
        shutdown: shutdown_tx,
        server,
    })
}

pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn shutdown(self) -> std::io::Result<()> {
        let _ = self.shutdown.send(());
        match self.server.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }
}

/// Failure responses. Internal details are logged, never sent.
#[derive(Debug)]
pub enum ApiError {
    Validation(Vec<FieldError>),
    NotFound,
    Internal,
}

impl From<TaskError> for ApiError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::Validation(errors) => ApiError::Validation(errors),
            TaskError::NotFound(_) => ApiError::NotFound,
            other => {
                tracing::error!(error = %other, "request failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors }))).into_response(),
            ApiError::NotFound => (StatusCode::NOT_FOUND, Json(json!({ "error": "Task not found." }))).into_response(),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "errors": [FieldError::new("Server", Message::ServerError.to_string())] })),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

async fn list_tasks(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<Json<Vec<TaskWire>>, ApiError> {
    let tasks = state.tasks.list(query.filter.as_deref()).await?;
    Ok(Json(tasks.iter().map(TaskWire::from).collect()))
}

async fn get_task(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<TaskWire>, ApiError> {
    match state.tasks.get_by_id(id).await? {
        Some(task) => Ok(Json(task.to_wire())),
        None => Err(ApiError::NotFound),
    }
}

async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedId>), ApiError> {
    let task = validate_task(&json_body(body)?).map_err(ApiError::Validation)?;
    let id = state.tasks.create(&task).await?;
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let task = validate_task(&json_body(body)?).map_err(ApiError::Validation)?;
    match state.tasks.update(id, &task).await? {
        WriteOutcome::Applied => Ok(StatusCode::OK),
        WriteOutcome::NotFound => Err(ApiError::NotFound),
    }
}

async fn complete_task(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    match state.tasks.set_completed(id).await? {
        WriteOutcome::Applied => Ok(StatusCode::NO_CONTENT),
        WriteOutcome::NotFound => Err(ApiError::NotFound),
    }
}

async fn delete_task(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    state.tasks.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unreadable JSON is reported like any other validation failure.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::Validation(vec![FieldError::new("body", rejection.body_text())]))
}
