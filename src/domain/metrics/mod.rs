//! Per-credential usage counters and the model health board.

mod health;
mod registry;

pub use health::{HealthBoard, HealthSnapshot, ModelHealth};
pub use registry::{CredentialUsage, MetricsRegistry};
