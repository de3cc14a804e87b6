//! Inference-service client
//!
//! Sends an image plus a text instruction to an OpenAI-compatible
//! chat-completions endpoint and returns the raw response body. Transport
//! failures (network errors, timeouts, upstream 5xx) are retried a bounded
//! number of times; upstream 4xx and everything downstream of transport are
//! not, since retrying cannot fix them.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use snapqa_core::{AppError, VisionConfig};

/// Capability for the outbound inference call. Injected into the pipeline so
/// tests can substitute a stub.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Send the image with the configured instruction and return the raw
    /// envelope body text. The normalizer owns all parsing.
    async fn extract(&self, image: &[u8]) -> Result<String, AppError>;
}

// Chat-completions request structures
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

/// Whether a failed call is worth another attempt.
enum CallFailure {
    Retryable(AppError),
    Fatal(AppError),
}

/// Production `VisionClient` over HTTP.
pub struct HttpVisionClient {
    http: reqwest::Client,
    config: VisionConfig,
    api_key: String,
}

impl Debug for HttpVisionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpVisionClient")
            .field("api_base", &self.config.api_base)
            .field("model", &self.config.model)
            .finish()
    }
}

impl HttpVisionClient {
    pub fn new(config: VisionConfig) -> Result<Self, AppError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::Internal("VISION_API_KEY is not configured".to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    fn build_request(&self, base64_image: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: vec![MessageParam {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: self.config.prompt.clone(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{}", base64_image),
                        },
                    },
                ],
            }],
        }
    }

    async fn call_once(&self, base64_image: &str) -> Result<String, CallFailure> {
        let body = self.build_request(base64_image);

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "Inference request timed out".to_string()
                } else {
                    "Failed to reach inference service".to_string()
                };
                CallFailure::Retryable(AppError::UpstreamTransport {
                    message,
                    details: e.to_string(),
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            let details = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let err = AppError::UpstreamTransport {
                message: format!("Inference service returned status {}", status),
                details,
            };
            return Err(if status.is_server_error() {
                CallFailure::Retryable(err)
            } else {
                CallFailure::Fatal(err)
            });
        }

        response.text().await.map_err(|e| {
            CallFailure::Retryable(AppError::UpstreamTransport {
                message: "Failed to read inference response body".to_string(),
                details: e.to_string(),
            })
        })
    }
}

#[async_trait]
impl VisionClient for HttpVisionClient {
    async fn extract(&self, image: &[u8]) -> Result<String, AppError> {
        use base64::Engine;
        let base64_image = base64::engine::general_purpose::STANDARD.encode(image);

        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.call_once(&base64_image).await {
                Ok(body) => return Ok(body),
                Err(CallFailure::Fatal(err)) => return Err(err),
                Err(CallFailure::Retryable(err)) => {
                    if attempt >= max_attempts {
                        return Err(err);
                    }
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        error = %err,
                        "Inference call failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_wait_ms)).await;
                    attempt += 1;
                }
            }
        }
    }
}
