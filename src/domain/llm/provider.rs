use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// One structured-output call against a generative backend.
#[derive(Debug, Clone)]
pub struct ProviderCall<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    pub prompt: &'a str,
    pub schema: &'a Value,
    pub temperature: f32,
}

/// A generative backend able to produce a JSON document for a prompt
/// under a response schema. Implementations own transport concerns and
/// surface failures as domain errors.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, call: ProviderCall<'_>) -> Result<Value, DomainError>;
}
