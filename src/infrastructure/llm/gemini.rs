use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::HttpClientTrait;
use crate::domain::llm::{GenerativeProvider, ProviderCall};
use crate::domain::DomainError;

const PROVIDER_NAME: &str = "gemini";

/// Gemini REST backend using the `generateContent` endpoint with
/// structured output. The API key travels in a header, never in the
/// URL, so it cannot leak into access logs.
#[derive(Debug)]
pub struct GeminiProvider {
    http_client: Arc<dyn HttpClientTrait>,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(http_client: Arc<dyn HttpClientTrait>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    fn build_body(call: &ProviderCall<'_>) -> Value {
        json!({
            "contents": [
                {
                    "parts": [
                        {"text": call.prompt}
                    ]
                }
            ],
            "generationConfig": {
                "temperature": call.temperature,
                "responseMimeType": "application/json",
                "responseSchema": call.schema,
            }
        })
    }

    fn extract_document(response: Value) -> Result<Value, DomainError> {
        let text = response
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DomainError::provider(PROVIDER_NAME, "response carried no candidate text")
            })?;

        serde_json::from_str(text).map_err(|e| {
            DomainError::schema_violation(format!("candidate text is not valid JSON: {}", e))
        })
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn generate(&self, call: ProviderCall<'_>) -> Result<Value, DomainError> {
        let url = self.endpoint(call.model);
        let body = Self::build_body(&call);

        let response = self
            .http_client
            .post_json(&url, vec![("x-goog-api-key", call.api_key)], &body)
            .await
            .map_err(|e| match e {
                DomainError::Provider {
                    message, status, ..
                } => DomainError::Provider {
                    provider: PROVIDER_NAME.to_string(),
                    message,
                    status,
                },
                other => other,
            })?;

        Self::extract_document(response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::infrastructure::llm::HttpClient;

    fn provider(base_url: &str) -> GeminiProvider {
        GeminiProvider::new(Arc::new(HttpClient::new()), base_url)
    }

    fn call<'a>(schema: &'a Value) -> ProviderCall<'a> {
        ProviderCall {
            api_key: "AIzaTestKey1234567890123456",
            model: "gemini-2.5-flash",
            prompt: "Genera una secuencia.",
            schema,
            temperature: 0.7,
        }
    }

    fn candidate_response(text: &str) -> Value {
        json!({
            "candidates": [
                {"content": {"parts": [{"text": text}]}}
            ]
        })
    }

    #[tokio::test]
    async fn test_generate_parses_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "AIzaTestKey1234567890123456"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_response(r#"{"tema_principal": "Fracciones"}"#)),
            )
            .mount(&server)
            .await;

        let schema = json!({"type": "OBJECT"});
        let document = provider(&server.uri()).generate(call(&schema)).await.unwrap();
        assert_eq!(document["tema_principal"], "Fracciones");
    }

    #[tokio::test]
    async fn test_http_429_keeps_status_and_provider_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({"error": {"message": "quota exceeded"}})),
            )
            .mount(&server)
            .await;

        let schema = json!({"type": "OBJECT"});
        let err = provider(&server.uri()).generate(call(&schema)).await.unwrap_err();
        match err {
            DomainError::Provider {
                provider,
                message,
                status,
            } => {
                assert_eq!(provider, "gemini");
                assert_eq!(status, Some(429));
                assert!(message.contains("quota exceeded"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_candidates_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let schema = json!({"type": "OBJECT"});
        let err = provider(&server.uri()).generate(call(&schema)).await.unwrap_err();
        assert!(err.to_string().contains("no candidate text"));
    }

    #[tokio::test]
    async fn test_unparsable_candidate_text_is_schema_violation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_response("this is not json")),
            )
            .mount(&server)
            .await;

        let schema = json!({"type": "OBJECT"});
        let err = provider(&server.uri()).generate(call(&schema)).await.unwrap_err();
        assert!(matches!(err, DomainError::SchemaViolation { .. }));
    }

    #[test]
    fn test_body_carries_schema_and_temperature() {
        let schema = json!({"type": "OBJECT", "properties": {}});
        let body = GeminiProvider::build_body(&call(&schema));
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Genera una secuencia.");
    }
}
