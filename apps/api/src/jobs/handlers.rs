//! Axum route handlers for the Jobs API.
//!
//! All boundary checks live here: multipart shape, file extension and size
//! limits, submitter identity shape, pagination bounds, and the full
//! text-quality validator for the direct-text endpoint. Input that fails a
//! boundary check never reaches the pipeline or the analysis engine.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::pipeline;
use crate::models::job::JobResponse;
use crate::state::AppState;
use crate::validator;

/// Upload size cap, enforced before the pipeline runs.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["txt", "doc", "docx", "pdf", "jpg", "jpeg", "png"];

const DEFAULT_PAGE_LIMIT: i64 = 20;
const MAX_PAGE_LIMIT: i64 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Query types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
    pub submitter_email: String,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitterQuery {
    pub email: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/upload
///
/// Multipart fields: `file` (the document) and `submitter_email`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<JobResponse>, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut submitter_email: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(String::from)
                    .ok_or_else(|| AppError::Validation("File field has no name".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Storage(format!("Failed to read upload: {e}")))?;
                file = Some((file_name, bytes.to_vec()));
            }
            Some("submitter_email") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable field: {e}")))?;
                submitter_email = Some(value);
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("A file is required".to_string()))?;
    let submitter_email = submitter_email
        .ok_or_else(|| AppError::Validation("submitter_email is required".to_string()))?;

    check_email_shape(&submitter_email)?;

    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "File exceeds the {} MB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    check_extension(&file_name)?;

    let response = pipeline::analyze_from_file(
        state.analyzer.as_ref(),
        state.repo.as_ref(),
        &state.files,
        &bytes,
        &file_name,
        &submitter_email,
    )
    .await?;

    Ok(Json(response))
}

/// POST /api/v1/jobs/analyze-text
///
/// Runs the full six-rule validator; a rejection short-circuits with the
/// verdict's reason and never reaches the pipeline.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<JobResponse>, AppError> {
    check_email_shape(&request.submitter_email)?;

    let verdict = validator::validate(&request.text);
    if !verdict.accepted {
        return Err(AppError::Validation(verdict.reason));
    }

    let response = pipeline::analyze_from_text(
        state.analyzer.as_ref(),
        state.repo.as_ref(),
        &request.text,
        &request.submitter_email,
        request.title.as_deref(),
    )
    .await?;

    Ok(Json(response))
}

/// GET /api/v1/jobs?skip=&limit=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<JobResponse>>, AppError> {
    let (skip, limit) = check_page_params(&params)?;
    let jobs = pipeline::list_jobs(state.repo.as_ref(), skip, limit).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/by-submitter?email=
pub async fn handle_list_by_submitter(
    State(state): State<AppState>,
    Query(params): Query<SubmitterQuery>,
) -> Result<Json<Vec<JobResponse>>, AppError> {
    check_email_shape(&params.email)?;
    let jobs = pipeline::list_jobs_by_submitter(state.repo.as_ref(), &params.email).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>, AppError> {
    let job = pipeline::get_job(state.repo.as_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if pipeline::delete_job(state.repo.as_ref(), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Job {id} not found")))
    }
}

/// GET /api/v1/files/:name/download
///
/// Always attachment-style disposition.
pub async fn handle_download_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (bytes, content_type, display_name) = state.files.retrieve(&name).await?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{display_name}\""),
            ),
        ],
        bytes,
    ))
}

/// GET /api/v1/files/:name/view
///
/// Inline disposition with fixed cache and framing headers.
pub async fn handle_view_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (bytes, content_type, display_name) = state.files.retrieve(&name).await?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{display_name}\""),
            ),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
            (header::X_FRAME_OPTIONS, "SAMEORIGIN".to_string()),
        ],
        bytes,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Boundary checks
// ────────────────────────────────────────────────────────────────────────────

/// Shape check only; deliverability is never verified.
fn check_email_shape(email: &str) -> Result<(), AppError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

fn check_extension(file_name: &str) -> Result<(), AppError> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext) => Ok(()),
        _ => Err(AppError::Validation(format!(
            "File type not allowed; accepted extensions: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ))),
    }
}

fn check_page_params(params: &PageParams) -> Result<(i64, i64), AppError> {
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT);

    if skip < 0 {
        return Err(AppError::Validation("skip must be >= 0".to_string()));
    }
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }
    Ok((skip, limit))
}
