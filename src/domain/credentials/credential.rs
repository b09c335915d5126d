use serde::Serialize;

use crate::config::CredentialConfig;

/// Minimum accepted key length. Anything shorter is treated as a
/// placeholder or truncated paste and excluded from rotation.
pub const MIN_KEY_LEN: usize = 20;

/// One configured API key for the generative provider, identified by a
/// human label for metrics and audit records. The key itself is never
/// serialized.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderCredential {
    label: String,
    #[serde(skip_serializing)]
    key: String,
}

impl ProviderCredential {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }

    /// Resolve the configured credentials from their environment
    /// variables. Missing variables produce credentials with empty keys;
    /// those are registered for metrics but excluded from rotation by
    /// `is_well_formed`.
    pub fn from_config(configs: &[CredentialConfig]) -> Vec<Self> {
        configs
            .iter()
            .map(|c| Self::new(&c.label, std::env::var(&c.env).unwrap_or_default()))
            .collect()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// A credential is usable only when a key is present and long enough
    /// to plausibly be real. Malformed credentials must never reach the
    /// network call.
    pub fn is_well_formed(&self) -> bool {
        !self.key.is_empty() && self.key.len() >= MIN_KEY_LEN
    }
}
