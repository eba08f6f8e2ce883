use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::models::AnalysisReport;
use crate::analysis::tips::{improvement_tips, ImprovementTips};
use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentKind, ExtractionError, MAX_UPLOAD_BYTES};
use crate::state::AppState;

/// Multipart field carrying the résumé file.
const UPLOAD_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub msg: String,
    pub original_name: String,
    pub analysis: AnalysisReport,
}

struct UploadedFile {
    name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

/// POST /api/v1/resume/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = state.analyzer.analyze(&req.text).await?;
    Ok(Json(report))
}

/// POST /api/v1/resume/tips
pub async fn handle_tips(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ImprovementTips>, AppError> {
    let report = state.analyzer.analyze(&req.text).await?;
    Ok(Json(improvement_tips(&report)))
}

/// POST /api/v1/resume/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let file = read_upload(multipart).await?;

    let kind = DocumentKind::detect(file.content_type.as_deref(), Some(&file.name))
        .ok_or(ExtractionError::UnsupportedMediaType)?;
    info!("Received {} ({:?}, {} bytes)", file.name, kind, file.bytes.len());

    // extraction is CPU bound, and pdf-extract may panic on malformed documents
    let bytes = file.bytes;
    let text = match tokio::task::spawn_blocking(move || extract_text(&bytes, kind)).await {
        Ok(result) => result?,
        Err(e) if e.is_panic() => {
            warn!("Text extraction panicked for {}", file.name);
            return Err(AppError::Validation(
                "Failed to extract text from file".to_string(),
            ));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context("extraction task was cancelled")
                .into())
        }
    };

    let analysis = state.analyzer.analyze(&text).await?;

    Ok(Json(UploadResponse {
        msg: "Resume uploaded and analyzed successfully".to_string(),
        original_name: file.name,
        analysis,
    }))
}

/// Pulls the `resume` field out of the form, ignoring any other fields.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(too_large());
        }
        return Ok(UploadedFile {
            name,
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge(format!(
        "File exceeds the {} MB upload limit",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    ))
}
