use crate::domain::DomainError;

/// Failure class recorded in the attempt audit. The fallback loop keeps
/// trying on every class; the label only tells operators whether an
/// attempt hit a transient limit or something structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Recoverable,
    Fatal,
}

pub fn classify(error: &DomainError) -> ErrorClass {
    match error {
        DomainError::Provider { status, message, .. } => {
            if *status == Some(429) || is_quota_message(message) {
                ErrorClass::Recoverable
            } else {
                ErrorClass::Fatal
            }
        }
        // A malformed document from one model may still come out well
        // formed from the next one in the chain.
        DomainError::SchemaViolation { .. } => ErrorClass::Recoverable,
        _ => ErrorClass::Fatal,
    }
}

fn is_quota_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("429")
        || lower.contains("quota")
        || lower.contains("limit")
        || lower.contains("resource_exhausted")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_429_is_recoverable() {
        let err = DomainError::provider_with_status("gemini", "too many requests", Some(429));
        assert_eq!(classify(&err), ErrorClass::Recoverable);
    }

    #[test]
    fn test_quota_substring_is_recoverable() {
        let err = DomainError::provider("gemini", "Quota exceeded for this project");
        assert_eq!(classify(&err), ErrorClass::Recoverable);
        let err = DomainError::provider("gemini", "RESOURCE_EXHAUSTED");
        assert_eq!(classify(&err), ErrorClass::Recoverable);
    }

    #[test]
    fn test_schema_violation_is_recoverable() {
        let err = DomainError::schema_violation("missing required field 'rubrica'");
        assert_eq!(classify(&err), ErrorClass::Recoverable);
    }

    #[test]
    fn test_other_provider_errors_are_fatal() {
        let err = DomainError::provider_with_status("gemini", "invalid api key", Some(400));
        assert_eq!(classify(&err), ErrorClass::Fatal);
        let err = DomainError::internal("connection reset");
        assert_eq!(classify(&err), ErrorClass::Fatal);
    }
}
