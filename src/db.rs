use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Owned handle to the Postgres pool. Opened by the process entry point and
/// closed by it once the server has stopped.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn open(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&config.url)
            .await
            .context("connect to database")?;
        info!(max_connections = config.max_connections, "database pool opened");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies `./migrations`. A failed migration is logged, not fatal.
    pub async fn migrate(&self) {
        if let Err(e) = sqlx::migrate!("./migrations").run(&self.pool).await {
            warn!(error = %e, "migrations folder not found or migration failed; continuing");
        }
    }

    pub async fn close(self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}
