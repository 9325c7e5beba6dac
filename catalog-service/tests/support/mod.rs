#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use catalog_service::metrics::ServiceMetrics;
use catalog_service::store::MemoryStore;
use catalog_service::{build_router, AppState};
use common_auth::{SigningKeyStore, TokenCodec, TokenConfig};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"catalog-test-secret-0123456789abcdef";

pub struct TestApp {
    pub router: Router,
    pub codec: Arc<TokenCodec>,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let keys = SigningKeyStore::from_secret(TEST_SECRET).expect("test key");
        let codec = Arc::new(TokenCodec::new(TokenConfig::new(120), Arc::new(keys)));
        let store = Arc::new(MemoryStore::new());
        let metrics = Arc::new(ServiceMetrics::new().expect("metrics"));
        let state = AppState::new(store.clone(), store.clone(), codec.clone(), metrics);
        Self {
            router: build_router(state),
            codec,
            store,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let resp = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn register(&self, username: &str, password: &str, role: Option<&str>) -> (StatusCode, Value) {
        let mut body = json!({ "username": username, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        self.send(Method::POST, "/user/register", None, Some(body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/user/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Registers the user and returns its token.
    pub async fn token_for(&self, username: &str, role: &str) -> String {
        let (status, body) = self.register(username, "pw-123456", Some(role)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().expect("token").to_string()
    }
}
