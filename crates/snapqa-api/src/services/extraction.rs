//! Upload extraction pipeline
//!
//! Orchestrates one upload end to end: extract → validate → (optionally
//! downscale) → inference call → normalize → persist. Validation failures
//! short-circuit before the expensive upstream call. A failed store write
//! does not discard the computed pairs; they are returned with a warning.

use std::sync::Arc;

use axum::extract::Multipart;
use snapqa_core::models::UploadResponse;
use snapqa_core::AppError;
use snapqa_vision::normalize;

use crate::services::intake::{self, IntakeValidator};
use crate::services::preprocess::{self, DownscaleOptions};
use crate::state::AppState;

pub struct ExtractionService {
    state: Arc<AppState>,
}

impl ExtractionService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Run the full pipeline for one multipart upload.
    pub async fn process(&self, multipart: Multipart) -> Result<UploadResponse, AppError> {
        // 1. Extract and validate before anything expensive happens
        let upload = intake::extract_multipart_file(multipart).await?;
        let validator = IntakeValidator::new(self.state.config.max_upload_bytes);
        let mut payload = validator.validate(upload)?;

        // 2. Optional downscale/re-encode to control upstream payload size
        if self.state.config.downscale_enabled {
            let options = DownscaleOptions {
                max_width: self.state.config.downscale_max_width,
                jpeg_quality: self.state.config.downscale_jpeg_quality,
                max_output_bytes: self.state.config.max_upload_bytes,
            };
            let data = payload;
            payload = tokio::task::spawn_blocking(move || {
                preprocess::downscale_jpeg(&data, &options)
            })
            .await
            .map_err(|e| AppError::Internal(format!("Failed to process image: {}", e)))??;

            tracing::debug!(payload_bytes = payload.len(), "Upload downscaled");
        }

        // 3. Inference
        let raw = self.state.vision.extract(&payload).await?;

        // 4. Normalize the free-form response into storable pairs
        let pairs = normalize(&raw)?;
        tracing::info!(pair_count = pairs.len(), "Extraction complete");

        // 5. Persist, one row per pair
        let mut failed = 0usize;
        let mut last_error: Option<AppError> = None;
        for pair in &pairs {
            if let Err(e) = self.state.answers.insert(&pair.question, &pair.answer).await {
                tracing::error!(error = %e, "Failed to persist extracted pair");
                failed += 1;
                last_error = Some(e);
            }
        }

        let warning = last_error.map(|e| {
            format!(
                "Failed to persist {} of {} extracted pairs: {}",
                failed,
                pairs.len(),
                e
            )
        });

        Ok(UploadResponse {
            pairs,
            persisted: failed == 0,
            warning,
        })
    }
}
