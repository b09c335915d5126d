use std::collections::VecDeque;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::audit::{AttemptRecord, AuditSink, CompletionRecord};
use crate::domain::DomainError;

const MAX_RECORDS: usize = 1000;

/// Bounded in-memory sink, the default when no database is configured.
/// Oldest records are dropped once the cap is reached.
pub struct InMemoryAuditSink {
    attempts: RwLock<VecDeque<AttemptRecord>>,
    completions: RwLock<VecDeque<CompletionRecord>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self {
            attempts: RwLock::new(VecDeque::new()),
            completions: RwLock::new(VecDeque::new()),
        }
    }
}

impl Default for InMemoryAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record_attempt(&self, record: AttemptRecord) -> Result<(), DomainError> {
        let mut attempts = self
            .attempts
            .write()
            .map_err(|_| DomainError::storage("attempt log lock poisoned"))?;
        if attempts.len() >= MAX_RECORDS {
            attempts.pop_front();
        }
        attempts.push_back(record);
        Ok(())
    }

    async fn record_completion(&self, record: CompletionRecord) -> Result<(), DomainError> {
        let mut completions = self
            .completions
            .write()
            .map_err(|_| DomainError::storage("completion log lock poisoned"))?;
        if completions.len() >= MAX_RECORDS {
            completions.pop_front();
        }
        completions.push_back(record);
        Ok(())
    }

    async fn recent_attempts(&self, limit: usize) -> Result<Vec<AttemptRecord>, DomainError> {
        let attempts = self
            .attempts
            .read()
            .map_err(|_| DomainError::storage("attempt log lock poisoned"))?;
        Ok(attempts.iter().rev().take(limit).cloned().collect())
    }
}
