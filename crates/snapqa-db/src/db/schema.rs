//! Schema bootstrap and evolution
//!
//! The answer store is a single append-only table. Bootstrap runs once at
//! startup. Deployments whose store predates the question/answer columns get
//! them added non-destructively before first use.

use snapqa_core::AppError;
use sqlx::{Row, SqlitePool};

const CREATE_ANSWERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS answers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question TEXT NOT NULL DEFAULT '',
    answer TEXT NOT NULL DEFAULT '',
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Create the answers table if missing and add any columns an older store
/// lacks. Idempotent.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(CREATE_ANSWERS_TABLE).execute(pool).await?;

    let columns = column_names(pool, "answers").await?;
    for column in ["question", "answer"] {
        if !columns.iter().any(|c| c == column) {
            tracing::info!(column, "Adding missing column to answers table");
            sqlx::query(&format!(
                "ALTER TABLE answers ADD COLUMN {} TEXT NOT NULL DEFAULT ''",
                column
            ))
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

async fn column_names(pool: &SqlitePool, table: &str) -> Result<Vec<String>, AppError> {
    let rows = sqlx::query(&format!("PRAGMA table_info({})", table))
        .fetch_all(pool)
        .await?;
    rows.iter()
        .map(|row| row.try_get::<String, _>("name").map_err(AppError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database")
    }

    #[tokio::test]
    async fn test_ensure_schema_creates_table() {
        let pool = memory_pool().await;
        ensure_schema(&pool).await.unwrap();

        let columns = column_names(&pool, "answers").await.unwrap();
        for expected in ["id", "question", "answer", "created_at"] {
            assert!(columns.iter().any(|c| c == expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let pool = memory_pool().await;
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_schema_adds_missing_columns() {
        let pool = memory_pool().await;
        // A store from before the question/answer columns existed.
        sqlx::query(
            "CREATE TABLE answers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO answers DEFAULT VALUES")
            .execute(&pool)
            .await
            .unwrap();

        ensure_schema(&pool).await.unwrap();

        let columns = column_names(&pool, "answers").await.unwrap();
        assert!(columns.iter().any(|c| c == "question"));
        assert!(columns.iter().any(|c| c == "answer"));

        // Pre-existing rows survive with the column default.
        let question: String = sqlx::query_scalar("SELECT question FROM answers LIMIT 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(question, "");
    }
}
