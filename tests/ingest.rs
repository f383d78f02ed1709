//! End-to-end tests for the document ingestion endpoint

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use std::sync::Arc;
use schemaforge::server::{AppState, router};
use tower::ServiceExt;

const BOUNDARY: &str = "X-SCHEMAFORGE-TEST-BOUNDARY";

fn multipart_body(field: &str, filename: &str, content: &str) -> String {
    format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/xml\r\n\r\n\
         {content}\r\n\
         --{b}--\r\n",
        b = BOUNDARY,
    )
}

fn upload_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/documents")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(body: String) -> (StatusCode, String) {
    let dir = tempfile::tempdir().unwrap();
    let app = router(Arc::new(AppState {
        upload_dir: dir.path().to_path_buf(),
    }));

    let response = app.oneshot(upload_request(body)).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_well_formed_document_accepted() {
    let body = multipart_body("document", "doc.xml", r#"<root><item id="1"/></root>"#);
    let (status, body) = send(body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_malformed_document_rejected() {
    let body = multipart_body("document", "broken.xml", "<root><item>");
    let (status, body) = send(body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("rejected document 'broken.xml'"), "body: {}", body);
    assert!(body.contains("Parse error"), "body: {}", body);
}

#[tokio::test]
async fn test_missing_field_rejected() {
    // a file arrives, but under the wrong field name
    let body = multipart_body("attachment", "doc.xml", "<root/>");
    let (status, body) = send(body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("missing file field 'document'"), "body: {}", body);
}

#[tokio::test]
async fn test_empty_multipart_rejected() {
    let body = format!("--{b}--\r\n", b = BOUNDARY);
    let (status, _body) = send(body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
