#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use social_api::config::ServerConfig;
use social_api::identity::FixedIdentity;
use social_api::router::build_app_router;
use social_api::state::AppState;
use social_core::types::DbId;
use social_core::validation::ValidationRules;
use social_db::memory::MemoryStore;
use social_db::models::post::{CreatePost, Post};
use social_db::models::user::{NewUser, User};
use social_db::store::{PostStore, UserStore};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        env: "test".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        viewer_id: 1,
    }
}

/// Build the full application router over `store`, with every request
/// attributed to `viewer_id`.
pub fn build_test_app(store: &MemoryStore, viewer_id: DbId) -> Router {
    let state = AppState {
        storage: store.storage(),
        config: Arc::new(test_config()),
        rules: Arc::new(ValidationRules::new()),
        identity: Arc::new(FixedIdentity(viewer_id)),
    };
    build_app_router(state).unwrap()
}

pub async fn create_user(store: &MemoryStore, username: &str) -> User {
    UserStore::create(
        store,
        &NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn create_post(store: &MemoryStore, user_id: DbId, title: &str) -> Post {
    PostStore::create(
        store,
        user_id,
        &CreatePost {
            title: title.to_string(),
            content: format!("Body of {title}"),
            tags: Vec::new(),
        },
    )
    .await
    .unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<String>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json)
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body.to_string())).await
}

/// POST with a raw string body, for malformed-JSON tests.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(body.to_string())).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body.to_string())).await
}

pub async fn put_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::PUT, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
