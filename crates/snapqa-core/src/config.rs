//! Configuration module
//!
//! Environment-driven configuration for the API and the outbound inference
//! client. Every knob has a default so a bare `snapqa-api` starts locally
//! with nothing but a `VISION_API_KEY`.

use std::env;

// Common constants
const MAX_CONNECTIONS: u32 = 5;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_MB: usize = 5;
const RECENT_ANSWERS_LIMIT: i64 = 20;
const DOWNSCALE_MAX_WIDTH: u32 = 1024;
const DOWNSCALE_JPEG_QUALITY: u8 = 80;
const VISION_TIMEOUT_SECS: u64 = 30;
const VISION_MAX_ATTEMPTS: u32 = 3;
const VISION_RETRY_WAIT_MS: u64 = 2000;
const VISION_MAX_TOKENS: u32 = 512;

const DEFAULT_PROMPT: &str = "Based on the image, generate one relevant question about the \
content and provide a concise answer to it. Respond as a JSON object with \"question\" and \
\"answer\" fields, or a JSON array of such objects if the image shows several questions.";

/// Outbound inference-service configuration.
///
/// Vendor, model identifier, and prompt wording are deployment concerns; the
/// pipeline never inspects them.
#[derive(Clone, Debug)]
pub struct VisionConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub max_attempts: u32,
    pub retry_wait_ms: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Ceiling for an uploaded payload, in bytes.
    pub max_upload_bytes: usize,
    /// How many rows the listing endpoint returns.
    pub recent_answers_limit: i64,
    /// Downscale/re-encode uploads before sending them upstream.
    pub downscale_enabled: bool,
    pub downscale_max_width: u32,
    pub downscale_jpeg_quality: u8,
    pub vision: VisionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_mb = env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_MB);

        let vision = VisionConfig {
            api_base: env::var("VISION_API_BASE")
                .unwrap_or_else(|_| "https://api.perplexity.ai".to_string()),
            api_key: env::var("VISION_API_KEY")
                .or_else(|_| env::var("PPLX_API_KEY"))
                .ok(),
            model: env::var("VISION_MODEL").unwrap_or_else(|_| "sonar-reasoning-pro".to_string()),
            prompt: env::var("VISION_PROMPT").unwrap_or_else(|_| DEFAULT_PROMPT.to_string()),
            max_tokens: env::var("VISION_MAX_TOKENS")
                .unwrap_or_else(|_| VISION_MAX_TOKENS.to_string())
                .parse()
                .unwrap_or(VISION_MAX_TOKENS),
            timeout_seconds: env::var("VISION_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| VISION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(VISION_TIMEOUT_SECS),
            max_attempts: env::var("VISION_MAX_ATTEMPTS")
                .unwrap_or_else(|_| VISION_MAX_ATTEMPTS.to_string())
                .parse()
                .unwrap_or(VISION_MAX_ATTEMPTS),
            retry_wait_ms: env::var("VISION_RETRY_WAIT_MS")
                .unwrap_or_else(|_| VISION_RETRY_WAIT_MS.to_string())
                .parse()
                .unwrap_or(VISION_RETRY_WAIT_MS),
        };

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://answers.db".to_string()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            recent_answers_limit: env::var("RECENT_ANSWERS_LIMIT")
                .unwrap_or_else(|_| RECENT_ANSWERS_LIMIT.to_string())
                .parse()
                .unwrap_or(RECENT_ANSWERS_LIMIT),
            downscale_enabled: env::var("DOWNSCALE_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
            downscale_max_width: env::var("DOWNSCALE_MAX_WIDTH")
                .unwrap_or_else(|_| DOWNSCALE_MAX_WIDTH.to_string())
                .parse()
                .unwrap_or(DOWNSCALE_MAX_WIDTH),
            downscale_jpeg_quality: env::var("DOWNSCALE_JPEG_QUALITY")
                .unwrap_or_else(|_| DOWNSCALE_JPEG_QUALITY.to_string())
                .parse()
                .unwrap_or(DOWNSCALE_JPEG_QUALITY),
            vision,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server_port: 8080,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            db_timeout_seconds: 5,
            max_upload_bytes: MAX_UPLOAD_MB * 1024 * 1024,
            recent_answers_limit: RECENT_ANSWERS_LIMIT,
            downscale_enabled: false,
            downscale_max_width: DOWNSCALE_MAX_WIDTH,
            downscale_jpeg_quality: DOWNSCALE_JPEG_QUALITY,
            vision: VisionConfig {
                api_base: "http://localhost:0".to_string(),
                api_key: None,
                model: "test-model".to_string(),
                prompt: DEFAULT_PROMPT.to_string(),
                max_tokens: VISION_MAX_TOKENS,
                timeout_seconds: 1,
                max_attempts: 1,
                retry_wait_ms: 0,
            },
        }
    }

    #[test]
    fn test_is_production() {
        let mut config = test_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
        config.environment = "prod".to_string();
        assert!(config.is_production());
    }
}
