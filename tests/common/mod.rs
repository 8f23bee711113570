//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use academy_admin::{
    api,
    config::{Config, MainSiteConfig},
    db::{create_test_pool, migrations::run_migrations},
};
use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

/// Cache clear requests received by the fake public site
#[derive(Clone, Default)]
pub struct Recorded(Arc<Mutex<Vec<Value>>>);

impl Recorded {
    pub fn bodies(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }
}

async fn spawn_main_site(status: StatusCode) -> (String, Recorded) {
    let recorded = Recorded::default();

    async fn clear(
        State((status, recorded)): State<(StatusCode, Recorded)>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        recorded.0.lock().unwrap().push(body);
        status
    }

    let app = Router::new()
        .route("/api/cache/clear", post(clear))
        .with_state((status, recorded.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), recorded)
}

pub struct TestApp {
    pub router: Router,
    pub main_site: Recorded,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_main_site_status(StatusCode::OK).await
    }

    pub async fn with_main_site_status(status: StatusCode) -> Self {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let (url, main_site) = spawn_main_site(status).await;
        let upload_dir = TempDir::new().unwrap();

        let mut config = Config::default();
        config.main_site = MainSiteConfig {
            url,
            enabled: true,
            timeout_secs: 2,
        };
        config.upload.path = upload_dir.path().to_path_buf();

        let state = api::build_state(pool, &config).unwrap();
        let router = api::build_router(state, &config.server.cors_origin).unwrap();

        Self {
            router,
            main_site,
            upload_dir,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.request(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Multipart upload of a single `file` field
    pub async fn upload(
        &self,
        bucket: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> (StatusCode, Value) {
        let boundary = "academy-test-boundary";
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: {c}\r\n\r\n",
            b = boundary,
            f = file_name,
            c = content_type
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/upload/{}", bucket))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }
}
