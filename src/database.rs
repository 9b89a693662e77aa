use sqlx::{migrate::Migrator, postgres::PgPoolOptions, Pool, Postgres};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::StoreError;

// Миграции таблицы rooms вшиваются в бинарник
static MIGRATOR: Migrator = sqlx::migrate!("./src/migrations");

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Postgres>,
}

impl Database {
    /// Opens the pool and brings the schema up to date.
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect(url)
            .await?;
        info!(pool_size = config.pool_size, "Database connected");

        let db = Database { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        info!(count = MIGRATOR.iter().count(), "Running room migrations...");
        MIGRATOR.run(&self.pool).await?;
        info!("Migrations completed");
        Ok(())
    }
}
