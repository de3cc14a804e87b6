//! Startup configuration validation

use anyhow::Result;
use snapqa_core::Config;

/// Fail fast on misconfiguration instead of at the first request.
pub fn validate_config(config: &Config) -> Result<()> {
    if config
        .vision
        .api_key
        .as_deref()
        .map_or(true, |key| key.trim().is_empty())
    {
        anyhow::bail!("VISION_API_KEY must be set");
    }

    if config.max_upload_bytes == 0 {
        anyhow::bail!("MAX_UPLOAD_MB must be greater than zero");
    }

    if !(1..=100).contains(&config.downscale_jpeg_quality) {
        anyhow::bail!("DOWNSCALE_JPEG_QUALITY must be between 1 and 100");
    }

    if config.recent_answers_limit <= 0 {
        anyhow::bail!("RECENT_ANSWERS_LIMIT must be greater than zero");
    }

    if config.is_production() && config.cors_origins.contains(&"*".to_string()) {
        anyhow::bail!("CORS_ORIGINS cannot be '*' in production. Please specify explicit origins.");
    }

    Ok(())
}
