use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::llm::ErrorClass;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AttemptOutcome {
    Success,
    Error {
        class: ErrorClass,
        message: String,
    },
}

/// One provider attempt inside a generation. A generation that succeeds
/// on its third attempt leaves exactly three of these behind.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub id: Uuid,
    pub generation_id: Uuid,
    pub credential_label: String,
    pub model: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn new(
        generation_id: Uuid,
        credential_label: impl Into<String>,
        model: impl Into<String>,
        outcome: AttemptOutcome,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            generation_id,
            credential_label: credential_label.into(),
            model: model.into(),
            outcome,
            duration_ms,
            created_at: Utc::now(),
        }
    }
}

/// Full-response log for a completed generation, kept separately from
/// the per-attempt trail so the heavy payload can be pruned on its own
/// schedule.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRecord {
    pub id: Uuid,
    pub generation_id: Uuid,
    pub user_email: String,
    pub model: String,
    pub prompt: String,
    pub response: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl CompletionRecord {
    pub fn new(
        generation_id: Uuid,
        user_email: impl Into<String>,
        model: impl Into<String>,
        prompt: impl Into<String>,
        response: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            generation_id,
            user_email: user_email.into(),
            model: model.into(),
            prompt: prompt.into(),
            response,
            created_at: Utc::now(),
        }
    }
}
