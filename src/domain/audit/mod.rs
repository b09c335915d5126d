//! Attempt audit trail: one record per provider attempt plus an
//! optional full-response log for completed generations.

mod record;
mod sink;

pub use record::{AttemptOutcome, AttemptRecord, CompletionRecord};
pub use sink::AuditSink;
