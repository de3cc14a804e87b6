//! Application setup and initialization
//!
//! All application initialization logic lives here rather than in main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod validation;

use std::sync::Arc;

use anyhow::{Context, Result};
use snapqa_core::Config;
use snapqa_db::AnswerRepository;
use snapqa_vision::{HttpVisionClient, VisionClient};

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    // Initialize telemetry first
    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    // Setup database and the answer store
    let pool = database::setup_database(&config).await?;
    let answers = AnswerRepository::new(pool);

    // Outbound inference client
    let vision: Arc<dyn VisionClient> = Arc::new(HttpVisionClient::new(config.vision.clone())?);

    let state = Arc::new(AppState::new(config.clone(), answers, vision));

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
