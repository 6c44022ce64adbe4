//! # Analysis Web Server
//!
//! Thin HTTP boundary around the analysis pipeline.
//!
//! ## Endpoints
//!
//! | Path | Description |
//! |------|-------------|
//! | `POST /api/analyze` | Multipart upload (field `file`), responds with the JSON report |
//! | `GET /api/analyze/ping` | Liveness check |
//!
//! The upload is persisted to a transient temp file for the duration of the
//! analysis and removed afterwards (best effort; removal failures are logged,
//! never propagated). The report's `filename` is the original upload name,
//! not the transient path.

use std::io::Write;
use std::path::Path;

use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::audio::analysis::analyze;
use crate::error::AnalysisError;
use crate::report::Report;

/// The port on which the analysis server listens.
pub const SERVER_PORT: u16 = 8080;

/// Maximum accepted upload size in bytes.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

pub fn router() -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_upload))
        .route("/api/analyze/ping", get(ping))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

async fn ping() -> &'static str {
    "analyze endpoint alive"
}

async fn analyze_upload(mut multipart: Multipart) -> Result<Json<Report>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
            upload = Some((original_name, data));
            break;
        }
    }

    let (original_name, data) = upload
        .ok_or_else(|| ApiError::BadRequest("multipart field 'file' is required".to_string()))?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("uploaded file is empty".to_string()));
    }

    // The decode pass is synchronous by design; keep it off the runtime.
    let report = tokio::task::spawn_blocking(move || run_analysis(&original_name, &data))
        .await
        .map_err(|e| ApiError::Internal(format!("analysis task failed: {e}")))??;

    Ok(Json(report))
}

fn run_analysis(original_name: &str, data: &[u8]) -> Result<Report, ApiError> {
    // Keep the upload's extension so the format probe gets its hint.
    let suffix = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
        .prefix("audio_")
        .suffix(&suffix)
        .tempfile()
        .map_err(|e| ApiError::Internal(format!("failed to create transient file: {e}")))?;
    temp.write_all(data)
        .map_err(|e| ApiError::Internal(format!("failed to persist upload: {e}")))?;
    temp.flush()
        .map_err(|e| ApiError::Internal(format!("failed to persist upload: {e}")))?;

    let result = analyze(temp.path());

    if let Err(e) = temp.close() {
        log::warn!("Failed to remove transient upload: {e}");
    }

    let mut report = result.map_err(ApiError::Analysis)?;
    report.filename = original_name.to_string();
    Ok(report)
}

/// Error surface of the HTTP boundary.
///
/// Invalid or unprocessable uploads map to 400 with the reason attached;
/// everything else is a 500.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Analysis(AnalysisError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Analysis(
                e @ (AnalysisError::InvalidAudioFile { .. }
                | AnalysisError::AudioProcessingFailure { .. }),
            ) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Analysis(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
