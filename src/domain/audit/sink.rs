use async_trait::async_trait;

use super::{AttemptRecord, CompletionRecord};
use crate::domain::DomainError;

/// Destination for audit records. Writes are best-effort from the
/// caller's point of view: the generation loop logs a sink failure and
/// keeps going rather than failing a request over its own audit trail.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record_attempt(&self, record: AttemptRecord) -> Result<(), DomainError>;

    async fn record_completion(&self, record: CompletionRecord) -> Result<(), DomainError>;

    /// Most recent attempts first, capped at `limit`.
    async fn recent_attempts(&self, limit: usize) -> Result<Vec<AttemptRecord>, DomainError>;
}
