use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::files::FileStore;

/// Source label used when a job was submitted as raw text with no title.
pub const DIRECT_INPUT_LABEL: &str = "Direct Input";

/// A persisted job analysis. Immutable after creation apart from deletion;
/// no workflow updates a row in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub submitter_email: String,
    pub original_text: String,
    pub improved_text: String,
    /// Original file name, caller-supplied title, or `"Direct Input"`.
    pub source_label: String,
    /// The analysis engine's payload, verbatim.
    pub analysis: Option<Value>,
    pub file_name: Option<String>,
    pub stored_name: Option<String>,
    pub content_type: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Fields the pipeline assembles before persistence. The repository assigns
/// `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub submitter_email: String,
    pub original_text: String,
    pub improved_text: String,
    pub source_label: String,
    pub analysis: Option<Value>,
    pub file_name: Option<String>,
    pub stored_name: Option<String>,
    pub content_type: Option<String>,
    pub file_size: Option<i64>,
}

/// File metadata included in responses for jobs that originated from an
/// uploaded file.
#[derive(Debug, Clone, Serialize)]
pub struct FileMetadata {
    pub original_name: String,
    pub content_type: String,
    pub size: i64,
    pub url: String,
}

/// Response shape returned by every job workflow.
#[derive(Debug, Clone, Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub original_text: String,
    pub improved_text: String,
    pub submitter_email: String,
    pub analysis: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub source_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileMetadata>,
}

impl From<JobRow> for JobResponse {
    fn from(row: JobRow) -> Self {
        let file = row.stored_name.as_ref().map(|stored_name| FileMetadata {
            original_name: row.file_name.clone().unwrap_or_default(),
            content_type: row.content_type.clone().unwrap_or_default(),
            size: row.file_size.unwrap_or(0),
            url: FileStore::url_for(stored_name),
        });

        JobResponse {
            id: row.id,
            original_text: row.original_text,
            improved_text: row.improved_text,
            submitter_email: row.submitter_email,
            analysis: row.analysis,
            created_at: row.created_at,
            source_label: row.source_label,
            file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(stored_name: Option<&str>) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            submitter_email: "hr@example.com".to_string(),
            original_text: "original".to_string(),
            improved_text: "improved".to_string(),
            source_label: "posting.pdf".to_string(),
            analysis: Some(json!({ "bias_score": 80 })),
            file_name: stored_name.map(|_| "posting.pdf".to_string()),
            stored_name: stored_name.map(String::from),
            content_type: stored_name.map(|_| "application/pdf".to_string()),
            file_size: stored_name.map(|_| 1024),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn file_job_maps_file_metadata_with_url() {
        let response = JobResponse::from(row(Some("abc-123.pdf")));
        let file = response.file.expect("file metadata");
        assert_eq!(file.original_name, "posting.pdf");
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.size, 1024);
        assert_eq!(file.url, "/api/v1/files/abc-123.pdf/download");
    }

    #[test]
    fn text_job_has_no_file_block() {
        let response = JobResponse::from(row(None));
        assert!(response.file.is_none());
        assert_eq!(response.analysis, Some(json!({ "bias_score": 80 })));
    }
}
