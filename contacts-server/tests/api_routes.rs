//! Router behaviour without a socket.

use std::fs;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use contacts_config::ServerConfig;
use contacts_fields::Record;
use contacts_server::{router, AppState};
use contacts_store::InMemoryStore;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct Fixture {
    _static_root: TempDir,
    app: Router,
}

fn fixture(records: Vec<Record>) -> Fixture {
    let static_root = TempDir::new().unwrap();
    fs::write(static_root.path().join("main.html"), "<html>shell</html>").unwrap();
    fs::write(static_root.path().join("app.js"), "console.log('contacts');").unwrap();
    let config = ServerConfig {
        static_dir: static_root.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let app = router(
        AppState::new(Arc::new(InMemoryStore::with_records(records))),
        &config,
    );
    Fixture {
        _static_root: static_root,
        app,
    }
}

fn ann() -> Record {
    Record::new()
        .with_id(1)
        .with_field("firstName", "Ann", "text")
        .with_field("email", "ann@example.com", "email")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, String) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn json_of(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[test_log::test(tokio::test)]
async fn list_returns_all_contacts() {
    let fx = fixture(vec![ann()]);
    let (status, body) = send(&fx.app, Method::GET, "/api/contact", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_of(&body),
        json!([{"id": 1, "firstName": ["Ann", "text"], "email": ["ann@example.com", "email"]}])
    );
}

#[test_log::test(tokio::test)]
async fn create_assigns_id_and_returns_201() {
    let fx = fixture(vec![ann()]);
    let (status, body) = send(
        &fx.app,
        Method::POST,
        "/api/contact",
        Some(json!({"id": 99, "firstName": ["Grace", "text"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_of(&body), json!({"id": 2, "firstName": ["Grace", "text"]}));
}

#[test_log::test(tokio::test)]
async fn get_existing_and_missing() {
    let fx = fixture(vec![ann()]);
    let (status, body) = send(&fx.app, Method::GET, "/api/contact/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body)["firstName"], json!(["Ann", "text"]));

    let (status, body) = send(&fx.app, Method::GET, "/api/contact/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_of(&body)["error"], json!("contact 7 not found"));
}

#[test_log::test(tokio::test)]
async fn non_numeric_id_is_bad_request() {
    let fx = fixture(vec![ann()]);
    for method in [Method::GET, Method::DELETE] {
        let (status, _) = send(&fx.app, method, "/api/contact/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[test_log::test(tokio::test)]
async fn update_replaces_fields_using_path_id() {
    let fx = fixture(vec![ann()]);
    let (status, body) = send(
        &fx.app,
        Method::PUT,
        "/api/contact/1",
        Some(json!({"firstName": ["Anna", "text"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({"id": 1, "firstName": ["Anna", "text"]}));

    let (_, body) = send(&fx.app, Method::GET, "/api/contact/1", None).await;
    assert!(json_of(&body).get("email").is_none());

    let (status, _) = send(
        &fx.app,
        Method::PUT,
        "/api/contact/5",
        Some(json!({"firstName": ["Nobody", "text"]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn delete_returns_204_then_404() {
    let fx = fixture(vec![ann()]);
    let (status, body) = send(&fx.app, Method::DELETE, "/api/contact/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = send(&fx.app, Method::DELETE, "/api/contact/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn static_files_are_served() {
    let fx = fixture(Vec::new());
    let (status, body) = send(&fx.app, Method::GET, "/app.js", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("contacts"));
}

#[test_log::test(tokio::test)]
async fn other_paths_get_the_app_shell() {
    let fx = fixture(Vec::new());
    for path in ["/", "/contacts", "/contact/new", "/contact/12"] {
        let (status, body) = send(&fx.app, Method::GET, path, None).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body, "<html>shell</html>", "{path}");
    }
}
