//! Database setup and initialization

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use snapqa_core::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Setup the connection pool and bring the schema up to date
pub async fn setup_database(config: &Config) -> Result<SqlitePool> {
    tracing::info!("Connecting to database...");
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .context("Invalid DATABASE_URL")?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .connect_with(options)
        .await?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );

    // Create the answers table if needed and add columns older stores lack
    snapqa_db::ensure_schema(&pool)
        .await
        .context("Failed to prepare database schema")?;
    tracing::info!("Database schema ready");

    Ok(pool)
}
