//! Answer repository
//!
//! Append-only store for extracted question/answer pairs. Rows are never
//! updated or deleted; retrieval is newest-first.

use snapqa_core::models::AnswerRecord;
use snapqa_core::AppError;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AnswerRepository {
    pool: SqlitePool,
}

impl AnswerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert one pair; the store assigns id and timestamp.
    pub async fn insert(&self, question: &str, answer: &str) -> Result<AnswerRecord, AppError> {
        let record = sqlx::query_as::<_, AnswerRecord>(
            "INSERT INTO answers (question, answer) VALUES (?1, ?2)
             RETURNING id, question, answer, created_at",
        )
        .bind(question)
        .bind(answer)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// The most recent `limit` rows, newest first. The id tie-break keeps
    /// ordering stable for rows inserted within the same timestamp granule.
    pub async fn recent(&self, limit: i64) -> Result<Vec<AnswerRecord>, AppError> {
        let records = sqlx::query_as::<_, AnswerRecord>(
            "SELECT id, question, answer, created_at FROM answers
             ORDER BY created_at DESC, id DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
