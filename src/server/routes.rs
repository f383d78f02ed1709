use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use std::io::Write;
use std::sync::Arc;
use crate::document;
use crate::server::AppState;

/// Multipart field that must carry the uploaded XML file
pub const DOCUMENT_FIELD: &str = "document";

/// Accept or reject one uploaded XML document.
///
/// The request must carry a file under the `document` field. Its bytes are
/// stored to a scratch file for the duration of the request and handed to
/// the XML parser; a well-formed document is accepted with an "OK" body,
/// anything else is rejected with a descriptive message. Exactly one
/// response per request.
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> (StatusCode, String) {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("malformed upload: {}", e));
            }
        };

        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("<unnamed>").to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("failed to read field '{}': {}", DOCUMENT_FIELD, e),
                );
            }
        };

        return ingest(&state, &original_name, &bytes);
    }

    (
        StatusCode::BAD_REQUEST,
        format!("missing file field '{}'", DOCUMENT_FIELD),
    )
}

/// Store the upload to a scratch file and run the parser over it.
///
/// The scratch file is deleted when this function returns.
fn ingest(state: &AppState, original_name: &str, bytes: &[u8]) -> (StatusCode, String) {
    let scratch = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".xml")
        .tempfile_in(&state.upload_dir)
        .and_then(|mut file| file.write_all(bytes).map(|_| file));

    let scratch = match scratch {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("failed to store upload '{}': {}", original_name, e);
            return (
                StatusCode::BAD_REQUEST,
                format!("failed to store upload '{}': {}", original_name, e),
            );
        }
    };

    match document::parse(scratch.path()) {
        Ok(doc) => {
            tracing::info!(
                "accepted document '{}' with root <{}>",
                original_name,
                doc.root().name()
            );
            (StatusCode::OK, "OK".to_string())
        }
        Err(e) => {
            tracing::warn!("rejected document '{}': {}", original_name, e);
            (
                StatusCode::BAD_REQUEST,
                format!("rejected document '{}': {}", original_name, e),
            )
        }
    }
}
