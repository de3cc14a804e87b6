use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::IntoResponse,
    Json,
};
use snapqa_core::models::AnswerResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// List the most recent extracted answers, newest first.
///
/// Records change frequently and staleness is user-visible, so intermediary
/// and browser caching is disabled.
#[utoipa::path(
    get,
    path = "/api/v0/answers",
    tag = "answers",
    responses(
        (status = 200, description = "Most recent answers, newest first", body = Vec<AnswerResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_answers"))]
pub async fn list_answers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state
        .answers
        .recent(state.config.recent_answers_limit)
        .await?;

    let response: Vec<AnswerResponse> = records.into_iter().map(Into::into).collect();

    Ok((
        [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        Json(response),
    ))
}
