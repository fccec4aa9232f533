//! Integration tests for the items service.
//!
//! The in-memory tests drive the full router and always run. The MySQL tests
//! need a reachable server configured through MYSQL_HOST, MYSQL_USER,
//! MYSQL_PASSWORD and MYSQL_DATABASE.
//! Run with: cargo test --test integration -- --ignored
//!
//! Note: The MySQL tests insert rows into the configured database.

use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use items_service::api::{create_router, AppState};
use items_service::config::Config;
use items_service::db::{initialize_schema, Database};
use items_service::items::{ItemStore, MockItemStore, MySqlItemStore, NewItem};

fn router_for(store: Arc<dyn ItemStore>) -> Router {
    create_router(AppState::new(store))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn create_request(name: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/items")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": name }).to_string()))
        .unwrap()
}

fn list_request() -> Request<Body> {
    Request::builder().uri("/items").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn created_ids_are_unique_and_strictly_increasing() {
    let app = router_for(Arc::new(MockItemStore::new()));

    let mut last_id = 0;
    for name in ["apple", "pear", "plum", "fig"] {
        let (status, body) = send(&app, create_request(name)).await;
        assert_eq!(status, StatusCode::CREATED);

        let id = body["id"].as_u64().unwrap();
        assert!(id > last_id, "id {} not greater than {}", id, last_id);
        last_id = id;
    }
}

#[tokio::test]
async fn list_returns_exactly_the_created_items() {
    let app = router_for(Arc::new(MockItemStore::new()));

    for name in ["apple", "pear"] {
        send(&app, create_request(name)).await;
    }

    let (status, body) = send(&app, list_request()).await;
    assert_eq!(status, StatusCode::OK);

    let names: HashSet<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, HashSet::from(["apple".to_string(), "pear".to_string()]));
}

#[tokio::test]
async fn repeated_lists_without_writes_are_identical() {
    let app = router_for(Arc::new(MockItemStore::new()));
    send(&app, create_request("apple")).await;

    let (_, first) = send(&app, list_request()).await;
    let (_, second) = send(&app, list_request()).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn rejected_create_leaves_list_unchanged() {
    let app = router_for(Arc::new(MockItemStore::new()));
    send(&app, create_request("apple")).await;
    let (_, before) = send(&app, list_request()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/items")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Name is required"}));

    let (_, after) = send(&app, list_request()).await;
    assert_eq!(before, after);
}

/// Build a MySQL-backed store from the environment.
async fn mysql_store() -> Option<MySqlItemStore> {
    let config = Config::load().ok()?;
    if std::env::var("MYSQL_HOST").is_err() {
        return None;
    }

    let db = Database::connect_lazy(&config);
    initialize_schema(&db).await.ok()?;
    Some(MySqlItemStore::new(db))
}

/// Test that an insert is visible to a subsequent list.
#[tokio::test]
#[ignore = "requires MySQL"]
async fn test_mysql_create_then_list() {
    let store = match mysql_store().await {
        Some(s) => s,
        None => {
            println!("Skipping: MYSQL_HOST not set or database unreachable");
            return;
        }
    };

    let item = NewItem::new(Some("integration-apple".to_string())).unwrap();
    let id = store.create(&item).await.expect("insert failed");
    assert!(id > 0);

    let items = store.list().await.expect("list failed");
    let found = items.iter().find(|i| i.id as u64 == id).expect("item missing");
    assert_eq!(found.name, "integration-apple");
}

/// Test that schema initialization can run repeatedly.
#[tokio::test]
#[ignore = "requires MySQL"]
async fn test_mysql_schema_init_is_idempotent() {
    let store = match mysql_store().await {
        Some(s) => s,
        None => {
            println!("Skipping: MYSQL_HOST not set or database unreachable");
            return;
        }
    };

    initialize_schema(store.database())
        .await
        .expect("second initialization failed");
}

/// Test the HTTP surface end to end against MySQL.
#[tokio::test]
#[ignore = "requires MySQL"]
async fn test_mysql_http_round_trip() {
    let store = match mysql_store().await {
        Some(s) => s,
        None => {
            println!("Skipping: MYSQL_HOST not set or database unreachable");
            return;
        }
    };
    let app = router_for(Arc::new(store));

    let (status, body) = send(&app, create_request("integration-pear")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Item created successfully");
    let id = body["id"].as_u64().unwrap();

    let (status, body) = send(&app, list_request()).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["id"].as_u64() == Some(id))
        .cloned()
        .expect("created item not listed");
    assert_eq!(listed["name"], "integration-pear");
    assert!(listed["created_at"].is_string());
}
