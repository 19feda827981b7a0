use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Duration;
use infrastructure::InMemoryTodoStore;
use serde_json::{json, Value};
use shared::{JwtSettings, JwtValidator};
use std::sync::Arc;
use todo_api::{app, AppState};
use tower::ServiceExt; // for `oneshot`

struct TestApp {
    router: Router,
    tokens: JwtValidator,
}

impl TestApp {
    fn new() -> Self {
        let tokens = JwtValidator::new(&JwtSettings {
            secret: "test_secret_key_for_testing_only".to_string(),
            issuer: None,
        });
        let state = AppState::new(Arc::new(InMemoryTodoStore::new()), tokens.clone());

        Self {
            router: app(state),
            tokens,
        }
    }

    fn token(&self, user: &str) -> String {
        self.tokens.issue_token(user, Duration::minutes(15)).unwrap()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("authorization", format!("Bearer {}", self.token(user)));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create(&self, user: &str, todo: Value) -> Value {
        let (status, json) = self
            .send("POST", "/todos", Some(user), Some(json!({ "todo": todo })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        json["todo"].clone()
    }
}

fn id_of(todo: &Value) -> String {
    todo["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_does_not_require_token() {
    let app = TestApp::new();

    let (status, json) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn every_todo_route_requires_token() {
    let app = TestApp::new();
    let todo = app.create("U1", json!({ "title": "a" })).await;
    let path = format!("/todos/{}", id_of(&todo));

    for (method, uri) in [
        ("GET", "/todos"),
        ("POST", "/todos"),
        ("GET", path.as_str()),
        ("PATCH", path.as_str()),
        ("DELETE", path.as_str()),
    ] {
        let (status, json) = app
            .send(method, uri, None, Some(json!({ "todo": { "title": "x" } })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(json["error"], "Missing bearer token");
    }

    // 認証失敗で何も変わっていない
    let (_, json) = app.send("GET", "/todos", Some("U1"), None).await;
    assert_eq!(json["todos"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_or_expired_token_is_rejected() {
    let app = TestApp::new();
    let expired = app.tokens.issue_token("U1", Duration::hours(-1)).unwrap();

    for header in [
        "Bearer not-a-jwt".to_string(),
        format!("Bearer {expired}"),
        "Basic dXNlcjpwYXNz".to_string(),
    ] {
        let request = Request::builder()
            .method("GET")
            .uri("/todos")
            .header("authorization", header)
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn list_is_empty_initially() {
    let app = TestApp::new();

    let (status, json) = app.send("GET", "/todos", Some("U1"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "todos": [] }));
}

#[tokio::test]
async fn list_returns_records_of_every_owner() {
    let app = TestApp::new();
    app.create("U1", json!({ "title": "A" })).await;
    app.create("U2", json!({ "title": "B" })).await;

    let (status, json) = app.send("GET", "/todos", Some("U3"), None).await;

    assert_eq!(status, StatusCode::OK);
    let mut titles: Vec<&str> = json["todos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["A", "B"]);
}

#[tokio::test]
async fn create_sets_owner_from_caller() {
    let app = TestApp::new();

    let todo = app
        .create("U1", json!({ "title": "x", "owner": "evil" }))
        .await;

    assert_eq!(todo["owner"], "U1");
    assert_eq!(todo["title"], "x");
    assert_eq!(id_of(&todo).len(), 26);

    let (status, json) = app
        .send("GET", &format!("/todos/{}", id_of(&todo)), Some("U2"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["todo"], todo);
}

#[tokio::test]
async fn create_validation_failures_are_422() {
    let app = TestApp::new();

    for body in [
        json!({ "todo": {} }),
        json!({ "todo": { "title": "" } }),
        json!({ "todo": { "title": "x", "done": false } }),
        json!({ "todo": "x" }),
        json!({ "title": "missing envelope" }),
    ] {
        let (status, json) = app.send("POST", "/todos", Some("U1"), Some(body.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert!(json["error"].is_string());
    }

    let request = Request::builder()
        .method("POST")
        .uri("/todos")
        .header("authorization", format!("Bearer {}", app.token("U1")))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let (_, json) = app.send("GET", "/todos", Some("U1"), None).await;
    assert_eq!(json, json!({ "todos": [] }));
}

#[tokio::test]
async fn get_unknown_or_malformed_id_is_404() {
    let app = TestApp::new();
    let unknown = domain::TodoId::new();

    let (status, json) = app
        .send("GET", &format!("/todos/{unknown}"), Some("U1"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Todo not found");

    let (status, json) = app.send("GET", "/todos/abc", Some("U1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Invalid identifier: abc");
}

#[tokio::test]
async fn patch_drops_empty_strings_and_returns_no_body() {
    let app = TestApp::new();
    let todo = app.create("U1", json!({ "title": "old" })).await;
    let path = format!("/todos/{}", id_of(&todo));

    let (status, json) = app
        .send(
            "PATCH",
            &path,
            Some("U1"),
            Some(json!({ "todo": { "title": "", "done": "true" } })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(json, Value::Null);

    let (_, json) = app.send("GET", &path, Some("U1"), None).await;
    assert_eq!(json["todo"]["title"], "old");
    assert_eq!(json["todo"]["done"], "true");
}

#[tokio::test]
async fn patch_cannot_reassign_owner() {
    let app = TestApp::new();
    let todo = app.create("U1", json!({ "title": "old" })).await;
    let path = format!("/todos/{}", id_of(&todo));

    let (status, _) = app
        .send(
            "PATCH",
            &path,
            Some("U1"),
            Some(json!({ "todo": { "owner": "U2", "title": "new" } })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, json) = app.send("GET", &path, Some("U1"), None).await;
    assert_eq!(json["todo"]["owner"], "U1");
    assert_eq!(json["todo"]["title"], "new");
}

#[tokio::test]
async fn patch_is_idempotent() {
    let app = TestApp::new();
    let todo = app.create("U1", json!({ "title": "old", "status": "open" })).await;
    let path = format!("/todos/{}", id_of(&todo));
    let body = json!({ "todo": { "status": "done" } });

    app.send("PATCH", &path, Some("U1"), Some(body.clone())).await;
    let (_, first) = app.send("GET", &path, Some("U1"), None).await;
    app.send("PATCH", &path, Some("U1"), Some(body)).await;
    let (_, second) = app.send("GET", &path, Some("U1"), None).await;

    assert_eq!(first, second);
    assert_eq!(second["todo"]["status"], "done");
}

#[tokio::test]
async fn patch_with_wrong_type_is_422_and_changes_nothing() {
    let app = TestApp::new();
    let todo = app.create("U1", json!({ "title": "old" })).await;
    let path = format!("/todos/{}", id_of(&todo));

    let (status, _) = app
        .send(
            "PATCH",
            &path,
            Some("U1"),
            Some(json!({ "todo": { "title": "new", "done": 1 } })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, json) = app.send("GET", &path, Some("U1"), None).await;
    assert_eq!(json["todo"], todo);
}

#[tokio::test]
async fn missing_record_is_404_even_for_non_owner() {
    let app = TestApp::new();
    let unknown = format!("/todos/{}", domain::TodoId::new());

    let (status, json) = app
        .send(
            "PATCH",
            &unknown,
            Some("anyone"),
            Some(json!({ "todo": { "title": "x" } })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Todo not found");

    let (status, _) = app.send("DELETE", &unknown, Some("anyone"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_body_errors_are_reported_before_lookup() {
    let app = TestApp::new();
    let unknown = format!("/todos/{}", domain::TodoId::new());

    let (status, json) = app
        .send("PATCH", &unknown, Some("U1"), Some(json!({ "title": "x" })))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("todo"));
}

#[tokio::test]
async fn non_owner_cannot_modify_or_delete() {
    let app = TestApp::new();
    let todo = app.create("U1", json!({ "title": "mine" })).await;
    let path = format!("/todos/{}", id_of(&todo));

    let (status, json) = app
        .send(
            "PATCH",
            &path,
            Some("U2"),
            Some(json!({ "todo": { "title": "stolen" } })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Not authorized to modify this Todo");

    let (status, _) = app.send("DELETE", &path, Some("U2"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // レコードはそのまま残っている
    let (status, json) = app.send("GET", &path, Some("U2"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["todo"], todo);
}

#[tokio::test]
async fn owner_can_delete() {
    let app = TestApp::new();
    let todo = app.create("U1", json!({ "title": "bye" })).await;
    let path = format!("/todos/{}", id_of(&todo));

    let (status, json) = app.send("DELETE", &path, Some("U1"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(json, Value::Null);

    let (status, _) = app.send("GET", &path, Some("U1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", &path, Some("U1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = TestApp::new();

    let (status, json) = app.send("GET", "/nope", Some("U1"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Route not found");
}
