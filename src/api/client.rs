//! Client-side task store.
//!
//! Mirrors the repository over HTTP and keeps the most recent full task list
//! in memory, so switching between views (`private`, `today`, a project, ...)
//! re-runs the shared filter engine locally instead of going back to the
//! server.
//!
//! ## Cache rules
//!
//! - Every write made through this store re-fetches the list afterwards.
//! - Writes by other clients are only seen on the next fetch.
//! - Latest request wins: each fetch takes a generation number when it is
//!   issued, and its result replaces the cache only if no later fetch was
//!   issued in the meantime. The replacement happens under one lock.
//!
//! Every request is bounded by the configured timeout and fails with
//! [`TaskError::Network`] when it expires.

use crate::libs::clock::{Clock, SystemClock};
use crate::libs::config::ClientConfig;
use crate::libs::error::{FieldError, TaskError};
use crate::libs::filter::{self, filter_by_name, FilterKey};
use crate::libs::messages::Message;
use crate::libs::task::{CreatedId, Task, TaskWire};
use crate::msg_debug;
use parking_lot::Mutex;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Cache {
    generation: u64,
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct ErrorList {
    errors: Vec<FieldError>,
}

pub struct TaskClient {
    client: Client,
    base_url: String,
    clock: Arc<dyn Clock>,
    issued: AtomicU64,
    cache: Mutex<Cache>,
}

impl TaskClient {
    pub fn new(config: &ClientConfig) -> Result<Self, TaskError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &ClientConfig, clock: Arc<dyn Clock>) -> Result<Self, TaskError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            clock,
            issued: AtomicU64::new(0),
            cache: Mutex::new(Cache::default()),
        })
    }

    /// Snapshot of the cached list.
    pub fn tasks(&self) -> Vec<Task> {
        self.cache.lock().tasks.clone()
    }

    /// Cached list narrowed by `key`, without a round trip.
    pub fn filtered(&self, key: FilterKey) -> Vec<Task> {
        filter::filter(&self.cache.lock().tasks, key, self.clock.now())
    }

    /// Like [`TaskClient::filtered`], but an unknown or absent name shows
    /// everything.
    pub fn view(&self, key: Option<&str>) -> Vec<Task> {
        filter_by_name(self.tasks(), key, self.clock.now())
    }

    pub fn projects(&self) -> Vec<String> {
        filter::projects(&self.cache.lock().tasks)
    }

    pub fn by_project(&self, project: &str) -> Vec<Task> {
        filter::by_project(&self.cache.lock().tasks, project)
    }

    /// Fetches the full list and, unless a newer fetch was issued meanwhile,
    /// makes it the cache. The fetched list is returned either way.
    pub async fn fetch_tasks(&self) -> Result<Vec<Task>, TaskError> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let response = self.client.get(self.url("/api/tasks")).send().await?;
        let response = check(response, None).await?;
        let tasks = decode::<Vec<TaskWire>>(response)
            .await?
            .into_iter()
            .map(Task::from_wire)
            .collect::<Result<Vec<_>, _>>()?;

        let mut cache = self.cache.lock();
        if generation == self.issued.load(Ordering::SeqCst) && generation > cache.generation {
            cache.generation = generation;
            cache.tasks = tasks.clone();
            msg_debug!(Message::CacheRefreshed(tasks.len()));
        } else {
            msg_debug!(Message::FetchSuperseded(generation));
        }

        Ok(tasks)
    }

    /// Asks the server to filter. Leaves the cache alone.
    pub async fn fetch_filtered(&self, key: FilterKey) -> Result<Vec<Task>, TaskError> {
        let response = self
            .client
            .get(self.url("/api/tasks"))
            .query(&[("filter", key.as_str())])
            .send()
            .await?;
        let response = check(response, None).await?;
        decode::<Vec<TaskWire>>(response)
            .await?
            .into_iter()
            .map(Task::from_wire)
            .collect()
    }

    pub async fn get_task(&self, id: i64) -> Result<Task, TaskError> {
        let response = self.client.get(self.url(&format!("/api/tasks/{}", id))).send().await?;
        let response = check(response, Some(id)).await?;
        Task::from_wire(decode::<TaskWire>(response).await?)
    }

    /// Creates the task on the server and returns its new id.
    pub async fn add_task(&self, task: &Task) -> Result<i64, TaskError> {
        let mut wire = task.to_wire();
        wire.id = None;

        let response = self.client.post(self.url("/api/tasks")).json(&wire).send().await?;
        let response = check(response, None).await?;
        let created = decode::<CreatedId>(response).await?;

        self.refresh().await;
        Ok(created.id)
    }

    /// Full replace of the task with `task.id`.
    pub async fn update_task(&self, task: &Task) -> Result<(), TaskError> {
        let id = task
            .id
            .ok_or_else(|| TaskError::Validation(vec![FieldError::new("id", "Task has no id")]))?;

        let response = self
            .client
            .put(self.url(&format!("/api/tasks/{}", id)))
            .json(&task.to_wire())
            .send()
            .await?;
        check(response, Some(id)).await?;

        self.refresh().await;
        Ok(())
    }

    pub async fn set_completed(&self, id: i64) -> Result<(), TaskError> {
        let response = self
            .client
            .patch(self.url(&format!("/api/tasks/{}/completed", id)))
            .send()
            .await?;
        check(response, Some(id)).await?;

        self.refresh().await;
        Ok(())
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), TaskError> {
        let response = self.client.delete(self.url(&format!("/api/tasks/{}", id))).send().await?;
        check(response, Some(id)).await?;

        self.refresh().await;
        Ok(())
    }

    /// Re-fetch after a successful write. The write itself already happened,
    /// so a failure here is logged and the stale cache kept.
    async fn refresh(&self) {
        if let Err(e) = self.fetch_tasks().await {
            tracing::warn!(error = %e, "task cache refresh failed after write");
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-success status into the matching [`TaskError`].
async fn check(response: Response, id: Option<i64>) -> Result<Response, TaskError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::NOT_FOUND => match id {
            Some(id) => Err(TaskError::NotFound(id)),
            None => Err(TaskError::Persistence(format!("no such endpoint: {}", response.url().path()))),
        },
        StatusCode::UNPROCESSABLE_ENTITY => match response.json::<ErrorList>().await {
            Ok(list) => Err(TaskError::Validation(list.errors)),
            Err(_) => Err(TaskError::Persistence("cannot parse server response".to_string())),
        },
        s if s.is_server_error() => Err(TaskError::Persistence(Message::ServerError.to_string())),
        s => Err(TaskError::Validation(vec![FieldError::new("request", s.to_string())])),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TaskError> {
    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            TaskError::Persistence(format!("cannot parse server response: {}", e))
        } else {
            TaskError::Network(e.to_string())
        }
    })
}
