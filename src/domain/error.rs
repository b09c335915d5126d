use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Credential error: {message}")]
    Credential { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider {
        provider: String,
        message: String,
        /// HTTP status returned by the provider, when one was received.
        /// Used for structured error classification before falling back
        /// to substring heuristics.
        status: Option<u16>,
    },

    #[error("Schema violation: {message}")]
    SchemaViolation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Generation exhausted after {attempts} attempts. Last error: {last_error}")]
    Exhausted { attempts: usize, last_error: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn provider_with_status(
        provider: impl Into<String>,
        message: impl Into<String>,
        status: impl Into<Option<u16>>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            status: status.into(),
        }
    }

    pub fn schema_violation(message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn exhausted(attempts: usize, last_error: impl Into<String>) -> Self {
        Self::Exhausted {
            attempts,
            last_error: last_error.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
