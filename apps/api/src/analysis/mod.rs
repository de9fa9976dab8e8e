//! Analysis Client — the single point of entry for all remote analysis
//! engine calls.
//!
//! The engine exposes two capabilities: extracting text from an uploaded
//! document and scoring/rewriting job-posting text. Both are wrapped here so
//! the rest of the service only sees the `Analyzer` trait and this module's
//! error taxonomy. Failures are never retried: one remote failure is one
//! caller-visible failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The engine answered with a non-success status. Status and body are
    /// carried verbatim for logging; they are never shown to end users.
    #[error("Engine error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// The engine claimed success but the body was not valid JSON. Kept
    /// distinct from `Api` so callers can tell "the engine errored" from
    /// "the engine lied about succeeding".
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Structured result of a text analysis. The payload is the engine's JSON
/// verbatim (scores, flagged issues, suggestions, keywords, improved text)
/// and is persisted unmodified.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub payload: Value,
}

impl AnalysisResult {
    /// The rewritten posting text, when the engine produced one.
    pub fn improved_text(&self) -> Option<&str> {
        self.payload.get("improved_text").and_then(|v| v.as_str())
    }
}

/// The remote analysis capability. Implement this to swap the engine out
/// (or mock it) without touching the pipeline or handler code.
///
/// Carried in `AppState` as `Arc<dyn Analyzer>`.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Extracts plain text from an uploaded document.
    async fn extract_text(&self, file_bytes: &[u8], file_name: &str)
        -> Result<String, AnalysisError>;

    /// Scores and rewrites job-posting text.
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError>;
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    text: String,
}

/// HTTP client for the analysis engine.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl AnalysisClient {
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_secs,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> AnalysisError {
        if e.is_timeout() {
            AnalysisError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            AnalysisError::Http(e)
        }
    }

    /// Checks the status and parses the body, keeping status/body verbatim
    /// on engine errors and surfacing parse failures distinctly.
    async fn read_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AnalysisError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn extract_text(
        &self,
        file_bytes: &[u8],
        file_name: &str,
    ) -> Result<String, AnalysisError> {
        let part = reqwest::multipart::Part::bytes(file_bytes.to_vec())
            .file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/extract", self.base_url))
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let extracted: ExtractResponse = self.read_response(response).await?;

        debug!(
            "Extraction succeeded: {} characters from '{}'",
            extracted.text.chars().count(),
            file_name
        );

        Ok(extracted.text)
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        let response = self
            .client
            .post(format!("{}/analyze", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let payload: Value = self.read_response(response).await?;

        debug!("Analysis succeeded: {} byte payload", payload.to_string().len());

        Ok(AnalysisResult { payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn improved_text_read_from_payload() {
        let result = AnalysisResult {
            payload: json!({
                "bias_score": 72,
                "improved_text": "We welcome applicants of all backgrounds."
            }),
        };
        assert_eq!(
            result.improved_text(),
            Some("We welcome applicants of all backgrounds.")
        );
    }

    #[test]
    fn improved_text_absent_or_non_string_is_none() {
        let absent = AnalysisResult { payload: json!({ "bias_score": 10 }) };
        assert_eq!(absent.improved_text(), None);

        let wrong_type = AnalysisResult { payload: json!({ "improved_text": 42 }) };
        assert_eq!(wrong_type.improved_text(), None);
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = AnalysisClient::new("http://engine.local/".to_string(), "k".to_string(), 5);
        assert_eq!(client.base_url, "http://engine.local");
    }
}
