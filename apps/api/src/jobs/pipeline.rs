//! Analysis Orchestrator — sequences ingestion, validation, remote analysis
//! and persistence for the two entry workflows, plus read/list/delete
//! pass-throughs.
//!
//! Failure policy: fail fast, nothing is retried, and no partial record is
//! ever persisted (the repository is only touched once a complete analysis
//! result is in hand). Every downstream failure is logged with its operation
//! and key, then re-signaled with its specific kind.

use tracing::{error, info};
use uuid::Uuid;

use crate::analysis::Analyzer;
use crate::errors::AppError;
use crate::files::{content_type_for, FileStore};
use crate::jobs::repository::JobRepository;
use crate::models::job::{JobResponse, NewJob, DIRECT_INPUT_LABEL};
use crate::validator::MIN_LENGTH;

/// Full file workflow: store the upload, extract its text remotely, check
/// the extraction, analyze, persist.
///
/// The stored file's lifecycle is independent of the job record: an
/// extraction or analysis failure leaves the file in place, and deleting a
/// job never deletes its file.
pub async fn analyze_from_file(
    analyzer: &dyn Analyzer,
    repo: &dyn JobRepository,
    files: &FileStore,
    file_bytes: &[u8],
    file_name: &str,
    submitter_email: &str,
) -> Result<JobResponse, AppError> {
    let stored = files.save(file_bytes, submitter_email, file_name).await?;
    info!(
        "Stored upload '{file_name}' as '{}' for {submitter_email}",
        stored.stored_name
    );

    let extracted = analyzer
        .extract_text(file_bytes, file_name)
        .await
        .map_err(|e| {
            error!("extract_text failed for '{file_name}': {e}");
            AppError::from(e)
        })?;

    if extracted.trim().is_empty() {
        error!("extract_text returned no text for '{file_name}'");
        return Err(AppError::EmptyExtraction {
            file_name: file_name.to_string(),
        });
    }

    // Pipeline-level length gate. The full validator only runs on the
    // direct-text boundary, not here; the asymmetry is intentional and the
    // file path's rejection message must stay as-is.
    let length = extracted.trim().chars().count();
    if length < MIN_LENGTH {
        return Err(AppError::TooShort {
            length,
            minimum: MIN_LENGTH,
        });
    }

    let result = analyzer.analyze(&extracted).await.map_err(|e| {
        error!("analyze failed for '{file_name}': {e}");
        AppError::from(e)
    })?;

    let job = repo
        .create(NewJob {
            submitter_email: submitter_email.to_string(),
            original_text: extracted,
            improved_text: result.improved_text().unwrap_or_default().to_string(),
            source_label: file_name.to_string(),
            analysis: Some(result.payload),
            file_name: Some(file_name.to_string()),
            stored_name: Some(stored.stored_name),
            content_type: Some(content_type_for(file_name).to_string()),
            file_size: Some(file_bytes.len() as i64),
        })
        .await
        .map_err(|e| {
            error!("persisting job for '{file_name}' failed: {e}");
            e
        })?;

    info!("Analyzed file '{file_name}' into job {}", job.id);
    Ok(JobResponse::from(job))
}

/// Direct-text workflow. The six-rule validator runs at the HTTP boundary
/// before this is called; only emptiness and minimum length are re-checked
/// here as a defensive invariant.
pub async fn analyze_from_text(
    analyzer: &dyn Analyzer,
    repo: &dyn JobRepository,
    text: &str,
    submitter_email: &str,
    title: Option<&str>,
) -> Result<JobResponse, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let length = trimmed.chars().count();
    if length < MIN_LENGTH {
        return Err(AppError::TooShort {
            length,
            minimum: MIN_LENGTH,
        });
    }

    let result = analyzer.analyze(trimmed).await.map_err(|e| {
        error!("analyze failed for text from {submitter_email}: {e}");
        AppError::from(e)
    })?;

    let source_label = match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None => DIRECT_INPUT_LABEL.to_string(),
    };

    let job = repo
        .create(NewJob {
            submitter_email: submitter_email.to_string(),
            original_text: trimmed.to_string(),
            improved_text: result.improved_text().unwrap_or_default().to_string(),
            source_label,
            analysis: Some(result.payload),
            file_name: None,
            stored_name: None,
            content_type: None,
            file_size: None,
        })
        .await
        .map_err(|e| {
            error!("persisting job for {submitter_email} failed: {e}");
            e
        })?;

    info!("Analyzed direct text into job {}", job.id);
    Ok(JobResponse::from(job))
}

/// Absent ids yield `None`, not an error; the boundary decides how to
/// surface that.
pub async fn get_job(
    repo: &dyn JobRepository,
    id: Uuid,
) -> Result<Option<JobResponse>, AppError> {
    Ok(repo.get(id).await?.map(JobResponse::from))
}

pub async fn list_jobs(
    repo: &dyn JobRepository,
    skip: i64,
    limit: i64,
) -> Result<Vec<JobResponse>, AppError> {
    let rows = repo.list(skip, limit).await?;
    Ok(rows.into_iter().map(JobResponse::from).collect())
}

pub async fn list_jobs_by_submitter(
    repo: &dyn JobRepository,
    submitter_email: &str,
) -> Result<Vec<JobResponse>, AppError> {
    let rows = repo.list_by_submitter(submitter_email).await?;
    Ok(rows.into_iter().map(JobResponse::from).collect())
}

/// Reports whether a record existed. The stored file, if any, is left alone.
pub async fn delete_job(repo: &dyn JobRepository, id: Uuid) -> Result<bool, AppError> {
    repo.delete(id).await
}
