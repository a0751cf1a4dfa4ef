use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use portfolio_backend::config::ServerConfig;
use portfolio_backend::media::MockMediaStore;
use portfolio_backend::project::{database, ProjectService, ProjectStorage};
use portfolio_backend::server::build_router;

pub const BOUNDARY: &str = "portfolio-test-boundary";

/// Router over an in-memory database and a mock media store
pub struct TestApp {
    pub router: Router,
    pub media: Arc<MockMediaStore>,
}

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8080".to_string()],
        max_upload_bytes: 1024 * 1024,
    }
}

pub async fn build_test_app() -> TestApp {
    let pool = database::in_memory().await.unwrap();
    let media = Arc::new(MockMediaStore::new());
    let service = Arc::new(ProjectService::new(
        Arc::new(ProjectStorage::new(pool)),
        media.clone(),
        "nan_pic",
    ));

    TestApp {
        router: build_router(service, &test_server_config()),
        media,
    }
}

/// One part of a multipart body
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, mime, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload.bin\"\r\n\
                         Content-Type: {mime}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(app: &TestApp, method: Method, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn send(app: &TestApp, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

/// Create a project through the API and return its JSON summary
pub async fn create_project(app: &TestApp, title: &str) -> serde_json::Value {
    let response = send_multipart(
        app,
        Method::POST,
        "/api/admin/projects",
        &[
            Part::Text("title", title),
            Part::Text("description", "A description"),
            Part::File("image", "image/jpeg", JPEG),
        ],
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["project"].clone()
}
