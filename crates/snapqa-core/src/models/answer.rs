use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One question/answer pair extracted from an uploaded image.
///
/// Transient: produced by the response normalizer and consumed by the
/// persistence write. Both fields may be empty individually, never both
/// (the sanitation pass drops such candidates before they reach here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QnaPair {
    pub question: String,
    pub answer: String,
}

/// Persisted answer row. Timestamp is assigned by the store at insert time.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AnswerRecord {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: NaiveDateTime,
}

/// Listing-endpoint item (row without the store-internal id).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnswerResponse {
    pub question: String,
    pub answer: String,
    pub timestamp: NaiveDateTime,
}

impl From<AnswerRecord> for AnswerResponse {
    fn from(record: AnswerRecord) -> Self {
        Self {
            question: record.question,
            answer: record.answer,
            timestamp: record.created_at,
        }
    }
}

/// Ingestion-endpoint response body.
///
/// `persisted` is false when the pairs were extracted but the store write
/// failed; the computed pairs are returned regardless, with `warning`
/// describing the failure.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    pub pairs: Vec<QnaPair>,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
