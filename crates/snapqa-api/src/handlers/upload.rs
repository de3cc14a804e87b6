use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use snapqa_core::models::UploadResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::extraction::ExtractionService;
use crate::state::AppState;

/// Upload image handler
///
/// Orchestrates the extraction pipeline by delegating to ExtractionService
/// for validation, the inference call, response normalization, and
/// persistence.
///
/// # Errors
/// - `AppError::NoFileUploaded` / `UnsupportedFormat` / `PayloadTooLarge` /
///   `MalformedEncoding` - upload rejected before any upstream call
/// - `AppError::UpstreamTransport` / `InvalidUpstreamEnvelope` - inference
///   call failed
#[utoipa::path(
    post,
    path = "/api/v0/uploads",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Question/answer pairs extracted", body = UploadResponse),
        (status = 400, description = "Upload rejected", body = ErrorResponse),
        (status = 502, description = "Inference service failure", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let service = ExtractionService::new(&state);
    let response = service.process(multipart).await.map_err(HttpAppError::from)?;

    Ok(Json(response))
}
