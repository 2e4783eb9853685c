//! Routes that never reach the database, served from a lazy pool.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup() -> TestServer {
    let app = common::create_test_app(common::lazy_pool());
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_root_redirects_to_journal() {
    let server = setup();

    let response = server.get("/").await;
    response.assert_status(StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.header("location"), "/journal/");
}

#[tokio::test]
async fn test_legacy_pdf_redirect() {
    let server = setup();

    let response = server.get("/journal/content/PA2014/PA20140001.pdf").await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "/static/journal/content/PA2014/PA20140001.pdf"
    );
}

#[tokio::test]
async fn test_legacy_redirect_encodes_spaces() {
    let server = setup();

    let response = server.get("/journal/content/Old%20Volume.pdf").await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "/static/journal/content/Old%20Volume.pdf"
    );
}

#[tokio::test]
async fn test_legacy_redirect_rejects_parent_segments() {
    let app = common::create_test_app(common::lazy_pool());

    let request = Request::builder()
        .uri("/journal/content/PA2014/../../secret.pdf")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_citation_requires_numeric_id() {
    let server = setup();

    for kind in ["citation", "bibtex", "ris"] {
        let response = server.get(&format!("/journal/{}/not-a-number/", kind)).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_volume_requires_numeric_year() {
    let server = setup();

    let response = server.get("/journal/volumes/latest/").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_static_files_served() {
    let server = setup();

    let response = server.get("/static/robots.txt").await;
    response.assert_status_ok();
    assert!(response.text().contains("User-agent"));
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let server = setup();

    let response = server.get("/cms/pages/").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_openapi_document_lists_api_paths() {
    let app = common::create_test_app(common::lazy_pool());

    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let paths = doc["paths"].as_object().expect("paths object");

    for path in [
        "/api/content",
        "/api/content/{id}",
        "/api/content/years",
        "/api/dissertations",
        "/api/meetings",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
}
