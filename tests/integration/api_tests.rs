//! API tests driving the router in-process

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    routing::get,
    Json, Router,
};
use bookshelf_server::{api, config::AppConfig, services::Services, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::common::{lookup_config, spawn_server};

struct TestApp {
    router: Router,
    lookup_base: String,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let lookup = Router::new()
            .route(
                "/isbn/0451524934.json",
                get(|| async {
                    Json(json!({
                        "title": "1984",
                        "authors": [{ "key": "/authors/OL118077A" }]
                    }))
                }),
            )
            .route(
                "/authors/OL118077A.json",
                get(|| async { Json(json!({ "name": "George Orwell" })) }),
            );
        let base = spawn_server(lookup).await;

        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.path = dir.path().join("library.json");
        config.open_library = lookup_config(&base);

        let services = Services::new(&config).unwrap();
        let state = AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        };

        Self {
            router: api::create_router(state),
            lookup_base: base,
            _dir: dir,
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(format!("/api/v1{}", uri));
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(&self, title: &str, author: &str, isbn: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/books/manual",
            Some(json!({ "title": title, "author": author, "isbn": isbn })),
        )
        .await
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["books"], 0);
    assert_eq!(body["lookup_service"], app.lookup_base);
}

#[tokio::test]
async fn test_manual_create_and_get() {
    let app = TestApp::new().await;

    let (status, body) = app.create("Dune", "Frank Herbert", "9780441013593").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "title": "Dune", "author": "Frank Herbert", "isbn": "9780441013593" }));

    let (status, body) = app.request(Method::GET, "/books/9780441013593", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune");

    let (status, body) = app.request(Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_manual_create_errors() {
    let app = TestApp::new().await;
    app.create("Dune", "Frank Herbert", "42").await;

    let (status, body) = app.create("Other", "Someone", "42").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    let (status, body) = app.create("  ", "Someone", "43").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, _) = app.create("Title", "Someone", "ISBN-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_manual_create_escapes_markup() {
    let app = TestApp::new().await;

    let (status, body) = app
        .create("<script>alert(1)</script>", "Mallory", "666")
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["title"].as_str().unwrap().contains("<script>"));
}

#[tokio::test]
async fn test_get_and_delete_errors() {
    let app = TestApp::new().await;

    let (status, _) = app.request(Method::GET, "/books/12345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request(Method::GET, "/books/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.request(Method::DELETE, "/books/12345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete() {
    let app = TestApp::new().await;
    app.create("Dune", "Frank Herbert", "42").await;

    let (status, _) = app.request(Method::DELETE, "/books/42", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.request(Method::GET, "/books/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search() {
    let app = TestApp::new().await;
    app.create("Animal Farm", "George Orwell", "1").await;
    app.create("Dune", "Frank Herbert", "2").await;

    let (status, body) = app.request(Method::GET, "/books/search/george", None).await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Animal Farm");

    let long_query = "q".repeat(101);
    let (status, _) = app
        .request(Method::GET, &format!("/books/search/{}", long_query), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.request(Method::GET, "/books/search/%20%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_import_by_isbn() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(Method::POST, "/books", Some(json!({ "isbn": "0451524934" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "title": "1984", "author": "George Orwell", "isbn": "0451524934" }));

    let (status, _) = app
        .request(Method::POST, "/books", Some(json!({ "isbn": "0451524934" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_import_unknown_isbn() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(Method::POST, "/books", Some(json!({ "isbn": "999" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "LookupFailure");

    let (_, body) = app.request(Method::GET, "/books", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats() {
    let app = TestApp::new().await;
    app.create("Animal Farm", "George Orwell", "1").await;
    app.create("1984", "George Orwell", "2").await;
    app.create("Dune", "Frank Herbert", "3").await;

    let (status, body) = app.request(Method::GET, "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "total_books": 3,
            "unique_authors": 2,
            "top_author": "George Orwell",
            "top_author_count": 2
        })
    );
}
