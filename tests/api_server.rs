#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::{DateTime, TimeZone, Utc};
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tasklist::api::client::TaskClient;
    use tasklist::api::server::{self, ServerHandle};
    use tasklist::db::{db::Db, tasks::Tasks};
    use tasklist::libs::clock::FixedClock;
    use tasklist::libs::config::ClientConfig;
    use tasklist::libs::error::TaskError;
    use tasklist::libs::filter::FilterKey;
    use tasklist::libs::task::Task;
    use test_context::{test_context, AsyncTestContext};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    /// Serves `router` on a free port and returns a client pointed at it.
    async fn scripted_server(router: Router) -> (TaskClient, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = TaskClient::with_clock(
            &ClientConfig {
                base_url: format!("http://{}", addr),
                timeout_secs: 5,
            },
            Arc::new(FixedClock(now())),
        )
        .unwrap();
        (client, server)
    }

    struct ServerContext {
        handle: ServerHandle,
        client: TaskClient,
        http: reqwest::Client,
    }

    impl ServerContext {
        fn url(&self, path: &str) -> String {
            format!("{}{}", self.handle.base_url(), path)
        }
    }

    impl AsyncTestContext for ServerContext {
        async fn setup() -> Self {
            let clock = Arc::new(FixedClock(now()));
            let tasks = Tasks::new(Db::in_memory().unwrap(), clock.clone());
            let handle = server::start("127.0.0.1:0", tasks).await.unwrap();

            let config = ClientConfig {
                base_url: handle.base_url(),
                timeout_secs: 5,
            };
            let client = TaskClient::with_clock(&config, clock).unwrap();

            ServerContext {
                handle,
                client,
                http: reqwest::Client::new(),
            }
        }

        async fn teardown(self) {
            self.handle.shutdown().await.unwrap();
        }
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_add_and_get_task(ctx: &mut ServerContext) {
        let deadline = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap();
        let task = Task::new("Buy milk").important().with_project("Home").with_deadline(deadline);

        let id = ctx.client.add_task(&task).await.unwrap();
        assert_eq!(id, 1);

        let fetched = ctx.client.get_task(id).await.unwrap();
        assert_eq!(fetched, task.with_id(1));
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_wire_shape(ctx: &mut ServerContext) {
        let response = ctx
            .http
            .post(ctx.url("/api/tasks"))
            .json(&json!({
                "description": "Buy milk",
                "important": true,
                "deadline": "2026-10-19T14:30:00Z"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.json::<Value>().await.unwrap(), json!({ "id": 1 }));

        let body: Value = ctx.http.get(ctx.url("/api/tasks/1")).send().await.unwrap().json().await.unwrap();
        assert_eq!(body["id"], 1);
        assert_eq!(body["description"], "Buy milk");
        assert_eq!(body["privateTask"], true);
        assert_eq!(body["important"], true);
        assert_eq!(body["completed"], false);
        assert_eq!(body["deadline"], "2026-10-19T14:30:00Z");
        assert!(body.get("project").is_none());
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_invalid_body_lists_every_field(ctx: &mut ServerContext) {
        let response = ctx
            .http
            .post(ctx.url("/api/tasks"))
            .json(&json!({ "description": "abc", "important": "yes", "deadline": "someday" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json().await.unwrap();
        let params: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["param"].as_str().unwrap())
            .collect();
        assert!(params.contains(&"description"));
        assert!(params.contains(&"important"));
        assert!(params.contains(&"deadline"));

        let tasks: Vec<Value> = ctx.http.get(ctx.url("/api/tasks")).send().await.unwrap().json().await.unwrap();
        assert!(tasks.is_empty());
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_unreadable_json_is_a_validation_error(ctx: &mut ServerContext) {
        let response = ctx
            .http
            .post(ctx.url("/api/tasks"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["errors"][0]["param"], "body");
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_client_reports_validation_errors(ctx: &mut ServerContext) {
        let err = ctx.client.add_task(&Task::new("abc")).await.unwrap_err();
        match err {
            TaskError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].param, "description");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(!ctx.client.add_task(&Task::new("abc")).await.unwrap_err().is_retryable());
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_missing_task_is_not_found(ctx: &mut ServerContext) {
        let response = ctx.http.get(ctx.url("/api/tasks/999")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>().await.unwrap(), json!({ "error": "Task not found." }));

        let response = ctx.http.patch(ctx.url("/api/tasks/999/completed")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert!(matches!(ctx.client.get_task(999).await, Err(TaskError::NotFound(999))));
        let ghost = Task::new("Nobody home").with_id(999);
        assert!(matches!(ctx.client.update_task(&ghost).await, Err(TaskError::NotFound(999))));
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_delete_missing_task_succeeds(ctx: &mut ServerContext) {
        let response = ctx.http.delete(ctx.url("/api/tasks/999")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        ctx.client.delete_task(999).await.unwrap();
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_writes_refresh_the_cache(ctx: &mut ServerContext) {
        assert!(ctx.client.tasks().is_empty());

        let id = ctx.client.add_task(&Task::new("Water plants")).await.unwrap();
        assert_eq!(ctx.client.tasks().len(), 1);

        let mut task = ctx.client.get_task(id).await.unwrap();
        task.description = "Water all plants".to_string();
        task.important = true;
        ctx.client.update_task(&task).await.unwrap();
        assert_eq!(ctx.client.tasks()[0].description, "Water all plants");
        assert_eq!(ctx.client.filtered(FilterKey::Important).len(), 1);

        ctx.client.set_completed(id).await.unwrap();
        assert!(ctx.client.tasks()[0].completed);

        ctx.client.delete_task(id).await.unwrap();
        assert!(ctx.client.tasks().is_empty());
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_other_writers_show_up_on_next_fetch(ctx: &mut ServerContext) {
        ctx.client.fetch_tasks().await.unwrap();
        ctx.http
            .post(ctx.url("/api/tasks"))
            .json(&json!({ "description": "Added elsewhere" }))
            .send()
            .await
            .unwrap();

        assert!(ctx.client.tasks().is_empty());
        ctx.client.fetch_tasks().await.unwrap();
        assert_eq!(ctx.client.tasks().len(), 1);
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_local_and_server_filters_agree(ctx: &mut ServerContext) {
        let day = |d: u32, h: u32| Utc.with_ymd_and_hms(2026, 10, d, h, 0, 0).unwrap();
        ctx.client.add_task(&Task::new("Water plants")).await.unwrap();
        ctx.client.add_task(&Task::new("Release notes").shared().important()).await.unwrap();
        ctx.client
            .add_task(&Task::new("Dentist visit").with_deadline(day(19, 15)).with_project("Health"))
            .await
            .unwrap();
        ctx.client
            .add_task(&Task::new("Quarterly review").shared().with_deadline(day(23, 10)).with_project("Work"))
            .await
            .unwrap();
        ctx.client.add_task(&Task::new("Renew passport").with_deadline(day(30, 9))).await.unwrap();

        for key in FilterKey::ALL {
            let remote = ctx.client.fetch_filtered(key).await.unwrap();
            assert_eq!(ctx.client.filtered(key), remote, "filter {}", key);
        }
        assert_eq!(ctx.client.tasks().len(), 5);

        assert_eq!(ctx.client.view(Some("urgent")).len(), 5);
        assert_eq!(ctx.client.projects(), vec!["Health".to_string(), "Work".to_string()]);
        assert_eq!(ctx.client.by_project("Work").len(), 1);
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_concurrent_fetches_leave_a_consistent_cache(ctx: &mut ServerContext) {
        ctx.client.add_task(&Task::new("Water plants")).await.unwrap();
        ctx.client.add_task(&Task::new("Release notes")).await.unwrap();

        let (a, b) = tokio::join!(ctx.client.fetch_tasks(), ctx.client.fetch_tasks());
        assert_eq!(a.unwrap().len(), 2);
        assert_eq!(b.unwrap().len(), 2);
        assert_eq!(ctx.client.tasks().len(), 2);
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_far_future_deadline_is_rejected(ctx: &mut ServerContext) {
        let response = ctx
            .http
            .post(ctx.url("/api/tasks"))
            .json(&json!({ "description": "Far future", "deadline": "+10000-01-01" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["errors"][0]["param"], "deadline");
    }

    #[test_context(ServerContext)]
    #[tokio::test]
    async fn test_unknown_endpoint_is_not_a_missing_task(ctx: &mut ServerContext) {
        let client = TaskClient::new(&ClientConfig {
            base_url: format!("{}/v0", ctx.handle.base_url()),
            timeout_secs: 5,
        })
        .unwrap();

        let err = client.fetch_tasks().await.unwrap_err();
        assert!(matches!(err, TaskError::Persistence(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_older_fetch_finishing_last_does_not_replace_cache() {
        async fn list(State(calls): State<Arc<AtomicUsize>>) -> Json<Value> {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Json(json!([{ "id": 1, "description": "Stale list" }]))
            } else {
                Json(json!([
                    { "id": 1, "description": "Fresh list" },
                    { "id": 2, "description": "Added since" }
                ]))
            }
        }
        let router = Router::new()
            .route("/api/tasks", get(list))
            .with_state(Arc::new(AtomicUsize::new(0)));
        let (client, server) = scripted_server(router).await;

        let older = client.fetch_tasks();
        let newer = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            client.fetch_tasks().await
        };
        let (older, newer) = tokio::join!(older, newer);

        let older = older.unwrap();
        assert_eq!(older.len(), 1);
        assert_eq!(older[0].description, "Stale list");
        assert_eq!(newer.unwrap().len(), 2);

        let cached = client.tasks();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].description, "Fresh list");
        server.abort();
    }

    #[tokio::test]
    async fn test_unreadable_deadline_from_server_is_rejected() {
        let router = Router::new().route(
            "/api/tasks",
            get(|| async { Json(json!([{ "id": 1, "description": "Read book", "deadline": "garbage" }])) }),
        );
        let (client, server) = scripted_server(router).await;

        match client.fetch_tasks().await {
            Err(TaskError::Validation(errors)) => assert_eq!(errors[0].param, "deadline"),
            other => panic!("expected a deadline validation error, got {:?}", other),
        }
        assert!(client.tasks().is_empty());
        server.abort();
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = TaskClient::new(&ClientConfig {
            base_url: format!("http://{}", addr),
            timeout_secs: 2,
        })
        .unwrap();

        let err = client.fetch_tasks().await.unwrap_err();
        assert!(matches!(err, TaskError::Network(_)));
        assert!(err.is_retryable());
        assert!(client.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let stall = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        });

        let client = TaskClient::new(&ClientConfig {
            base_url: format!("http://{}", addr),
            timeout_secs: 1,
        })
        .unwrap();

        let err = client.fetch_tasks().await.unwrap_err();
        assert!(matches!(err, TaskError::Network(_)));
        stall.abort();
    }
}
