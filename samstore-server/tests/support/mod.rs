#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use samstore_core::application::AppUnitOfWork;
use samstore_server::{AppState, create_app, infra::config::Config};
use serde_json::{Value, json};

/// A server over a fresh in-memory catalog.
pub fn test_server() -> TestServer {
    let state = AppState::new(
        Config::default(),
        Arc::new(AppUnitOfWork::in_memory()),
    );
    TestServer::new(create_app(state)).expect("test server")
}

pub async fn create_category(server: &TestServer, name: &str, parent: Option<i64>) -> Value {
    let response = server
        .post("/api/categories/")
        .json(&json!({ "name": name, "slug": name, "parent": parent }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

pub async fn create_product(server: &TestServer, name: &str, slug: &str) -> Value {
    let response = server
        .post("/api/product/")
        .json(&json!({ "name": name, "slug": slug, "active": true }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

pub fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("id present")
}
