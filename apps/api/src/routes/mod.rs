pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers::{self, MAX_UPLOAD_BYTES};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs/upload", post(handlers::handle_upload))
        .route(
            "/api/v1/jobs/analyze-text",
            post(handlers::handle_analyze_text),
        )
        .route("/api/v1/jobs", get(handlers::handle_list_jobs))
        .route(
            "/api/v1/jobs/by-submitter",
            get(handlers::handle_list_by_submitter),
        )
        .route(
            "/api/v1/jobs/:id",
            get(handlers::handle_get_job).delete(handlers::handle_delete_job),
        )
        .route(
            "/api/v1/files/:name/download",
            get(handlers::handle_download_file),
        )
        .route("/api/v1/files/:name/view", get(handlers::handle_view_file))
        // The handler enforces the 10 MB cap; leave headroom for the
        // multipart envelope.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .with_state(state)
}
