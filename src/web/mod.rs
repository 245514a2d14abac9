//! HTTP surface: the upload page and the meeting endpoint.
//!
//! One POST runs the whole pipeline and returns transcript plus summary
//! in a single JSON body. A summarization failure is not an HTTP error;
//! the transcript still comes back with `summary_error` set.

use crate::pipeline::{Pipeline, PipelineError, RunOutput};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

const INDEX_HTML: &str = include_str!("index.html");

/// Room for multipart boundaries and part headers on top of the audio.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(pipeline: Arc<Pipeline>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/meetings", post(upload_meeting))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .with_state(pipeline)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn upload_meeting(
    State(pipeline): State<Arc<Pipeline>>,
    mut multipart: Multipart,
) -> Response {
    let (filename, bytes) = match read_audio_field(&mut multipart).await {
        Ok(found) => found,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    info!("Received upload {} ({} bytes)", filename, bytes.len());

    match pipeline.run(&filename, &bytes).await {
        Ok(output) => success_response(output),
        Err(e) => {
            error!("Run failed for {}: {}", filename, e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

async fn read_audio_field(multipart: &mut Multipart) -> Result<(String, Bytes), String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Malformed upload: {e}"))?
    {
        if field.name() == Some("audio") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| format!("Failed to read upload: {e}"))?;
            return Ok((filename, bytes));
        }
    }
    Err("Missing \"audio\" field in upload".to_string())
}

fn success_response(output: RunOutput) -> Response {
    (StatusCode::OK, Json(output)).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::EmptyUpload
        | PipelineError::MissingExtension
        | PipelineError::UnsupportedFormat(_)
        | PipelineError::TooLarge { .. } => StatusCode::BAD_REQUEST,
        // Bad or corrupt audio surfaces here, not in a validation layer.
        PipelineError::Convert(_) | PipelineError::Segment(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::Transcribe(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ConvertError;
    use crate::transcribe::TranscribeError;

    #[test]
    fn test_input_errors_map_to_bad_request() {
        assert_eq!(status_for(&PipelineError::EmptyUpload), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&PipelineError::UnsupportedFormat("pdf".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&PipelineError::TooLarge { size: 2, limit: 1 }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upstream_errors_map_to_gateway_and_unprocessable() {
        assert_eq!(
            status_for(&PipelineError::Transcribe(TranscribeError::AllSegmentsFailed)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&PipelineError::Convert(ConvertError::ToolMissing(
                "ffmpeg".to_string()
            ))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_index_page_embeds_ui_regions() {
        assert!(INDEX_HTML.contains("Meeting Summarizer"));
        assert!(INDEX_HTML.contains("id=\"transcript\""));
        assert!(INDEX_HTML.contains("id=\"summary\""));
        assert!(INDEX_HTML.contains("name=\"audio\""));
    }
}
