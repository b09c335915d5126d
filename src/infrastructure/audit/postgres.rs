//! PostgreSQL audit sink

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::audit::{AttemptOutcome, AttemptRecord, AuditSink, CompletionRecord};
use crate::domain::llm::ErrorClass;
use crate::domain::DomainError;

/// Persistent sink writing attempts to `generation_attempts` and full
/// responses to `ai_complete_logs`.
#[derive(Debug, Clone)]
pub struct PostgresAuditSink {
    pool: PgPool,
}

impl PostgresAuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn record_attempt(&self, record: AttemptRecord) -> Result<(), DomainError> {
        let (success, error_class, error_message) = match &record.outcome {
            AttemptOutcome::Success => (true, None, None),
            AttemptOutcome::Error { class, message } => {
                (false, Some(class_to_str(*class)), Some(message.clone()))
            }
        };

        sqlx::query(
            r#"
            INSERT INTO generation_attempts
                (id, generation_id, credential_label, model, success,
                 error_class, error_message, duration_ms, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id)
        .bind(record.generation_id)
        .bind(&record.credential_label)
        .bind(&record.model)
        .bind(success)
        .bind(error_class)
        .bind(error_message)
        .bind(record.duration_ms as i64)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to record attempt: {}", e)))?;

        Ok(())
    }

    async fn record_completion(&self, record: CompletionRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO ai_complete_logs
                (id, generation_id, user_email, model, prompt, response, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(record.generation_id)
        .bind(&record.user_email)
        .bind(&record.model)
        .bind(&record.prompt)
        .bind(&record.response)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to record completion: {}", e)))?;

        Ok(())
    }

    async fn recent_attempts(&self, limit: usize) -> Result<Vec<AttemptRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, generation_id, credential_label, model, success,
                   error_class, error_message, duration_ms, created_at
            FROM generation_attempts
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list attempts: {}", e)))?;

        rows.iter().map(row_to_attempt).collect()
    }
}

fn row_to_attempt(row: &sqlx::postgres::PgRow) -> Result<AttemptRecord, DomainError> {
    let success: bool = row
        .try_get("success")
        .map_err(|e| DomainError::storage(format!("Invalid attempt row: {}", e)))?;

    let outcome = if success {
        AttemptOutcome::Success
    } else {
        let class: Option<String> = row
            .try_get("error_class")
            .map_err(|e| DomainError::storage(format!("Invalid attempt row: {}", e)))?;
        let message: Option<String> = row
            .try_get("error_message")
            .map_err(|e| DomainError::storage(format!("Invalid attempt row: {}", e)))?;
        AttemptOutcome::Error {
            class: class.as_deref().map(str_to_class).unwrap_or(ErrorClass::Fatal),
            message: message.unwrap_or_default(),
        }
    };

    let duration_ms: i64 = row
        .try_get("duration_ms")
        .map_err(|e| DomainError::storage(format!("Invalid attempt row: {}", e)))?;

    Ok(AttemptRecord {
        id: row
            .try_get("id")
            .map_err(|e| DomainError::storage(format!("Invalid attempt row: {}", e)))?,
        generation_id: row
            .try_get("generation_id")
            .map_err(|e| DomainError::storage(format!("Invalid attempt row: {}", e)))?,
        credential_label: row
            .try_get("credential_label")
            .map_err(|e| DomainError::storage(format!("Invalid attempt row: {}", e)))?,
        model: row
            .try_get("model")
            .map_err(|e| DomainError::storage(format!("Invalid attempt row: {}", e)))?,
        outcome,
        duration_ms: duration_ms as u64,
        created_at: row
            .try_get("created_at")
            .map_err(|e| DomainError::storage(format!("Invalid attempt row: {}", e)))?,
    })
}

fn class_to_str(class: ErrorClass) -> &'static str {
    match class {
        ErrorClass::Recoverable => "recoverable",
        ErrorClass::Fatal => "fatal",
    }
}

fn str_to_class(value: &str) -> ErrorClass {
    match value {
        "recoverable" => ErrorClass::Recoverable,
        _ => ErrorClass::Fatal,
    }
}
