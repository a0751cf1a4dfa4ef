//! Integration tests for the project API: full router, in-memory database,
//! mock media store.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, body_text, build_test_app, create_project, send, send_multipart, Part, JPEG};

// ---------------------------------------------------------------------------
// Liveness and listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_reports_liveness() {
    let app = build_test_app().await;
    let response = send(&app, Method::GET, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Portfolio Backend API is running.");
}

#[tokio::test]
async fn empty_listing_is_an_empty_array() {
    let app = build_test_app().await;
    let response = send(&app, Method::GET, "/api/projects").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn listing_is_newest_first_with_public_fields() {
    let app = build_test_app().await;
    create_project(&app, "first").await;
    create_project(&app, "second").await;

    let response = send(&app, Method::GET, "/api/projects").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "second");
    assert_eq!(items[1]["title"], "first");

    let keys: Vec<_> = items[0].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.len(), 4);
    for key in ["id", "title", "description", "image_url"] {
        assert!(items[0].get(key).is_some(), "missing {key}");
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_uploaded_url() {
    let app = build_test_app().await;
    let response = send_multipart(
        &app,
        Method::POST,
        "/api/admin/projects",
        &[
            Part::Text("title", "A"),
            Part::Text("description", "B"),
            Part::File("image", "image/jpeg", JPEG),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Project created successfully");
    assert_eq!(json["project"]["title"], "A");
    assert!(json["project"]["id"].is_i64());
    assert_eq!(
        json["project"]["image_url"],
        "https://media.test/image/upload/nan_pic/asset1.jpg"
    );
    assert_eq!(app.media.uploads(), vec!["asset1".to_string()]);
}

#[tokio::test]
async fn create_without_image_is_400_and_uploads_nothing() {
    let app = build_test_app().await;
    let response = send_multipart(
        &app,
        Method::POST,
        "/api/admin/projects",
        &[Part::Text("title", "A"), Part::Text("description", "B")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Title, description, and image are required."
    );
    assert!(app.media.uploads().is_empty());

    let listing = body_json(send(&app, Method::GET, "/api/projects").await).await;
    assert_eq!(listing, serde_json::json!([]));
}

#[tokio::test]
async fn create_with_blank_title_is_400() {
    let app = build_test_app().await;
    let response = send_multipart(
        &app,
        Method::POST,
        "/api/admin/projects",
        &[
            Part::Text("title", "   "),
            Part::Text("description", "B"),
            Part::File("image", "image/png", JPEG),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.media.uploads().is_empty());
}

#[tokio::test]
async fn create_without_multipart_body_is_400() {
    let app = build_test_app().await;
    let response = send(&app, Method::POST, "/api/admin/projects").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_unknown_field_is_400() {
    let app = build_test_app().await;
    let response = send_multipart(
        &app,
        Method::POST,
        "/api/admin/projects",
        &[
            Part::Text("title", "A"),
            Part::Text("description", "B"),
            Part::Text("is_admin", "true"),
            Part::File("image", "image/png", JPEG),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.media.uploads().is_empty());
}

#[tokio::test]
async fn create_passes_octet_stream_file_to_media_host() {
    let app = build_test_app().await;
    let response = send_multipart(
        &app,
        Method::POST,
        "/api/admin/projects",
        &[
            Part::Text("title", "A"),
            Part::Text("description", "B"),
            Part::File("image", "application/octet-stream", JPEG),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.media.uploads().len(), 1);
}

#[tokio::test]
async fn create_upload_failure_is_generic_500_and_writes_no_row() {
    let app = build_test_app().await;
    app.media.fail_uploads(true);

    let response = send_multipart(
        &app,
        Method::POST,
        "/api/admin/projects",
        &[
            Part::Text("title", "A"),
            Part::Text("description", "B"),
            Part::File("image", "image/jpeg", JPEG),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to create project.");

    let listing = body_json(send(&app, Method::GET, "/api/projects").await).await;
    assert_eq!(listing, serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_without_image_keeps_existing_url() {
    let app = build_test_app().await;
    let created = create_project(&app, "before").await;
    let id = created["id"].as_i64().unwrap();
    let url = created["image_url"].as_str().unwrap().to_string();

    let response = send_multipart(
        &app,
        Method::PUT,
        &format!("/api/admin/projects/{id}"),
        &[
            Part::Text("title", "after"),
            Part::Text("description", "new description"),
            Part::Text("existing_image_url", &url),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Project updated successfully");
    assert_eq!(json["project"]["title"], "after");
    assert_eq!(json["project"]["image_url"], url.as_str());
    assert!(app.media.deletes().is_empty());
    assert_eq!(app.media.uploads().len(), 1);
}

#[tokio::test]
async fn update_with_image_replaces_old_asset() {
    let app = build_test_app().await;
    let created = create_project(&app, "before").await;
    let id = created["id"].as_i64().unwrap();
    let url = created["image_url"].as_str().unwrap().to_string();

    let response = send_multipart(
        &app,
        Method::PUT,
        &format!("/api/admin/projects/{id}"),
        &[
            Part::Text("title", "after"),
            Part::Text("description", "new description"),
            Part::Text("existing_image_url", &url),
            Part::File("image", "image/png", JPEG),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["project"]["image_url"],
        "https://media.test/image/upload/nan_pic/asset2.png"
    );
    assert_eq!(app.media.deletes(), vec!["asset1".to_string()]);
    assert_eq!(app.media.uploads(), vec!["asset1".to_string(), "asset2".to_string()]);
    assert!(!app.media.contains("asset1"));
    assert!(app.media.contains("asset2"));
}

#[tokio::test]
async fn update_succeeds_when_old_asset_delete_fails() {
    let app = build_test_app().await;
    let created = create_project(&app, "before").await;
    let id = created["id"].as_i64().unwrap();
    let url = created["image_url"].as_str().unwrap().to_string();
    app.media.fail_deletes(true);

    let response = send_multipart(
        &app,
        Method::PUT,
        &format!("/api/admin/projects/{id}"),
        &[
            Part::Text("title", "after"),
            Part::Text("description", "d"),
            Part::Text("existing_image_url", &url),
            Part::File("image", "image/png", JPEG),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.media.deletes(), vec!["asset1".to_string()]);
}

#[tokio::test]
async fn update_without_title_is_400() {
    let app = build_test_app().await;
    let created = create_project(&app, "before").await;
    let id = created["id"].as_i64().unwrap();

    let response = send_multipart(
        &app,
        Method::PUT,
        &format!("/api/admin/projects/{id}"),
        &[Part::Text("description", "d"), Part::Text("existing_image_url", "u")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Title and description are required."
    );
}

#[tokio::test]
async fn update_without_image_or_existing_url_is_400() {
    let app = build_test_app().await;
    let created = create_project(&app, "before").await;
    let id = created["id"].as_i64().unwrap();

    let response = send_multipart(
        &app,
        Method::PUT,
        &format!("/api/admin/projects/{id}"),
        &[Part::Text("title", "t"), Part::Text("description", "d")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Stored URL untouched
    let listing = body_json(send(&app, Method::GET, "/api/projects").await).await;
    assert_eq!(listing[0]["image_url"], created["image_url"]);
}

#[tokio::test]
async fn update_of_unknown_id_is_404() {
    let app = build_test_app().await;

    let response = send_multipart(
        &app,
        Method::PUT,
        "/api/admin/projects/999",
        &[
            Part::Text("title", "t"),
            Part::Text("description", "d"),
            Part::Text("existing_image_url", "https://media.test/image/upload/nan_pic/x.jpg"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Project not found.");
}

#[tokio::test]
async fn update_with_non_numeric_id_is_400() {
    let app = build_test_app().await;

    let response = send_multipart(
        &app,
        Method::PUT,
        "/api/admin/projects/abc",
        &[
            Part::Text("title", "t"),
            Part::Text("description", "d"),
            Part::Text("existing_image_url", "u"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_row_and_asset() {
    let app = build_test_app().await;
    let created = create_project(&app, "doomed").await;
    let id = created["id"].as_i64().unwrap();

    let response = send(&app, Method::DELETE, &format!("/api/admin/projects/{id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Project deleted successfully");
    assert_eq!(app.media.deletes(), vec!["asset1".to_string()]);
    assert_eq!(app.media.asset_count(), 0);

    let listing = body_json(send(&app, Method::GET, "/api/projects").await).await;
    assert_eq!(listing, serde_json::json!([]));
}

#[tokio::test]
async fn delete_of_unknown_id_is_404_without_media_calls() {
    let app = build_test_app().await;

    let response = send(&app, Method::DELETE, "/api/admin/projects/12345").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.media.deletes().is_empty());
}

#[tokio::test]
async fn delete_reports_success_when_media_cleanup_fails() {
    let app = build_test_app().await;
    let created = create_project(&app, "doomed").await;
    let id = created["id"].as_i64().unwrap();
    app.media.fail_deletes(true);

    let response = send(&app, Method::DELETE, &format!("/api/admin/projects/{id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.media.deletes(), vec!["asset1".to_string()]);

    // Row is gone even though the asset is still hosted
    let response = send(&app, Method::DELETE, &format!("/api/admin/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Limits and CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = build_test_app().await;
    let big = vec![0u8; 2 * 1024 * 1024];

    let response = send_multipart(
        &app,
        Method::POST,
        "/api/admin/projects",
        &[
            Part::Text("title", "A"),
            Part::Text("description", "B"),
            Part::File("image", "image/jpeg", &big),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
    assert!(app.media.uploads().is_empty());
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let app = build_test_app().await;
    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/admin/projects")
        .header("Origin", "http://localhost:8080")
        .header("Access-Control-Request-Method", "POST")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:8080"
    );
}
