//! Shared test harness: an in-memory answer store and a stubbed vision
//! client wired into the real router.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use snapqa_api::setup::routes::setup_routes;
use snapqa_api::state::AppState;
use snapqa_core::{AppError, Config, VisionConfig};
use snapqa_db::{ensure_schema, AnswerRepository};
use snapqa_vision::VisionClient;
use sqlx::sqlite::SqlitePoolOptions;

/// Returns the versioned API path.
/// Usage: `api_path("/answers")` -> `/api/v0/answers`.
pub fn api_path(path: &str) -> String {
    format!("{}{}", snapqa_api::constants::API_PREFIX, path)
}

/// Upload ceiling used by the test configuration.
pub const TEST_MAX_UPLOAD_BYTES: usize = 64 * 1024;

pub struct TestApp {
    pub server: TestServer,
    pub answers: AnswerRepository,
}

/// Build the application with an isolated in-memory store and the given
/// vision client.
pub async fn setup_test_app(vision: Arc<dyn VisionClient>) -> TestApp {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    ensure_schema(&pool).await.expect("Failed to prepare schema");

    let answers = AnswerRepository::new(pool);
    let config = test_config();
    let state = Arc::new(AppState::new(config.clone(), answers.clone(), vision));
    let router = setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp { server, answers }
}

fn test_config() -> Config {
    Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 5,
        max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
        recent_answers_limit: 20,
        downscale_enabled: false,
        downscale_max_width: 1024,
        downscale_jpeg_quality: 80,
        vision: VisionConfig {
            api_base: "http://localhost:0".to_string(),
            api_key: Some("test-key".to_string()),
            model: "test-model".to_string(),
            prompt: "Extract the question and answer.".to_string(),
            max_tokens: 128,
            timeout_seconds: 1,
            max_attempts: 1,
            retry_wait_ms: 0,
        },
    }
}

/// A small real JPEG, as a camera upload would be.
pub fn small_jpeg() -> Vec<u8> {
    let img = RgbImage::from_pixel(16, 16, image::Rgb([200, 120, 40]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 85))
        .expect("Failed to encode test JPEG");
    buf.into_inner()
}

/// Vision client returning a canned response body.
pub struct StubVisionClient {
    body: String,
}

impl StubVisionClient {
    /// Stub whose envelope carries the given content field.
    pub fn with_content(content: &str) -> Arc<Self> {
        let body = serde_json::json!({
            "choices": [{"message": {"content": content}}]
        })
        .to_string();
        Arc::new(Self { body })
    }

    /// Stub returning the given raw body verbatim.
    pub fn with_raw_body(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: body.to_string(),
        })
    }
}

#[async_trait]
impl VisionClient for StubVisionClient {
    async fn extract(&self, _image: &[u8]) -> Result<String, AppError> {
        Ok(self.body.clone())
    }
}

/// Vision client whose call always fails at the transport level.
pub struct FailingVisionClient;

#[async_trait]
impl VisionClient for FailingVisionClient {
    async fn extract(&self, _image: &[u8]) -> Result<String, AppError> {
        Err(AppError::UpstreamTransport {
            message: "Inference service returned status 503".to_string(),
            details: "upstream overloaded".to_string(),
        })
    }
}
