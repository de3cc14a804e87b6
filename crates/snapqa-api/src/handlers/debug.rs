//! Debug/introspection handlers
//!
//! Operational conveniences outside the core contract: inspect raw recent
//! rows and insert a synthetic test row.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use snapqa_core::models::AnswerRecord;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Raw recent rows, ids and timestamps included.
#[utoipa::path(
    get,
    path = "/api/v0/debug/answers",
    tag = "debug",
    responses(
        (status = 200, description = "Raw recent rows", body = Vec<AnswerRecord>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_raw_answers"))]
pub async fn list_raw_answers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state
        .answers
        .recent(state.config.recent_answers_limit)
        .await?;
    Ok(Json(records))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TestAnswerRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// Insert a synthetic test row.
#[utoipa::path(
    post,
    path = "/api/v0/debug/answers",
    tag = "debug",
    request_body = TestAnswerRequest,
    responses(
        (status = 201, description = "Row inserted", body = AnswerRecord),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "insert_test_answer"))]
pub async fn insert_test_answer(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<TestAnswerRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state
        .answers
        .insert(&request.question, &request.answer)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}
