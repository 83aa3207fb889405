//! Axum route handlers for the Analysis API and pages.

use askama::Template;
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::batch::FileFailure;
use crate::analysis::export::{render_csv, CSV_CONTENT_TYPE, CSV_FILE_NAME};
use crate::analysis::pipeline::analyze_archive;
use crate::analysis::views::{ResultsPage, UploadPage};
use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;

/// Multipart field carrying the archive.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub batch_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub records: Vec<ResumeRecord>,
    pub failures: Vec<FileFailure>,
    pub skipped: usize,
}

/// GET /
pub async fn handle_upload_page() -> Result<Html<String>, AppError> {
    Ok(Html(UploadPage { error: None }.render()?))
}

/// POST /analyze
///
/// Form target of the upload page. Upload problems re-render the form with
/// the message instead of returning a JSON error.
pub async fn handle_analyze_page(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let result = match read_upload(multipart).await {
        Ok(archive) => analyze_archive(archive, state.extractor.as_ref()).await,
        Err(e) => Err(e),
    };

    let (_, outcome) = match result {
        Ok(ok) => ok,
        Err(e @ (AppError::Validation(_) | AppError::Archive(_))) => {
            let message = e.to_string();
            let page = UploadPage {
                error: Some(&message),
            };
            return Ok((StatusCode::BAD_REQUEST, Html(page.render()?)).into_response());
        }
        Err(e) => return Err(e),
    };

    let csv = if outcome.is_empty() {
        None
    } else {
        let bytes = render_csv(&outcome.records).map_err(|e| AppError::Internal(e.into()))?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    };

    let page = ResultsPage::new(&outcome, csv);
    Ok(Html(page.render()?).into_response())
}

/// POST /api/v1/analyze
///
/// Returns every extracted record plus the files that failed, as JSON.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let archive = read_upload(multipart).await?;
    let (batch_id, outcome) = analyze_archive(archive, state.extractor.as_ref()).await?;

    Ok(Json(AnalyzeResponse {
        batch_id,
        generated_at: Utc::now(),
        records: outcome.records,
        failures: outcome.failures,
        skipped: outcome.skipped,
    }))
}

/// POST /api/v1/analyze/csv
///
/// Returns `resume_analysis.csv` as an attachment. 422 when nothing was extracted.
pub async fn handle_analyze_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let archive = read_upload(multipart).await?;
    let (_, outcome) = analyze_archive(archive, state.extractor.as_ref()).await?;

    if outcome.is_empty() {
        return Err(AppError::NoValidResumes);
    }

    let body = render_csv(&outcome.records).map_err(|e| AppError::Internal(e.into()))?;
    let headers = [
        (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{CSV_FILE_NAME}\""),
        ),
    ];
    Ok((headers, body).into_response())
}

/// Pulls the archive bytes out of the `file` field.
async fn read_upload(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        if let Some(name) = field.file_name() {
            if !name.to_ascii_lowercase().ends_with(".zip") {
                return Err(AppError::Validation(format!(
                    "expected a .zip upload, got '{name}'"
                )));
            }
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("uploaded file is empty".to_string()));
        }
        return Ok(data);
    }

    Err(AppError::Validation(format!(
        "missing '{UPLOAD_FIELD}' field in multipart payload"
    )))
}
