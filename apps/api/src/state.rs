use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::files::FileStore;
use crate::jobs::repository::JobRepository;

/// Shared application state injected into all route handlers via Axum
/// extractors. Collaborators are constructed once at startup and passed in;
/// nothing here is ambient or global.
#[derive(Clone)]
pub struct AppState {
    /// Job persistence. `Arc<dyn …>` so the pipeline can be tested against
    /// an in-memory implementation.
    pub repo: Arc<dyn JobRepository>,
    /// Remote analysis engine (extraction + scoring).
    pub analyzer: Arc<dyn Analyzer>,
    /// Uploaded-file store rooted at `Config::upload_dir`.
    pub files: FileStore,
    /// Kept for handlers that need runtime settings; currently only read at
    /// startup.
    #[allow(dead_code)]
    pub config: Config,
}
