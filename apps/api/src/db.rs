use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Connection pool for the jobs database.
///
/// Sized for a request-scoped workload: a connection is held only around
/// single-statement repository calls, never across a remote analysis call,
/// so a small pool with a short acquire timeout is enough.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(16)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    info!("Connected to the jobs database");
    Ok(pool)
}
