use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::audit::{AttemptOutcome, AttemptRecord, AuditSink, CompletionRecord};
use crate::domain::credentials::ProviderCredential;
use crate::domain::llm::{classify, GenerativeProvider, ProviderCall};
use crate::domain::metrics::{HealthBoard, MetricsRegistry, ModelHealth};
use crate::domain::sequence::{build_prompt, response_schema, DidacticSequence, SequenceRequest};
use crate::domain::DomainError;

/// A successful generation plus the route that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub generation_id: Uuid,
    pub sequence: DidacticSequence,
    pub credential_label: String,
    pub model: String,
    pub attempts: usize,
}

/// Walks every well-formed credential, each over the full model list in
/// preference order, until one attempt yields a schema-complete
/// document. Credentials are tried least-loaded first; the model list
/// order is fixed.
pub struct Orchestrator {
    provider: Arc<dyn GenerativeProvider>,
    credentials: Vec<ProviderCredential>,
    models: Vec<String>,
    temperature: f32,
    attempt_timeout: Duration,
    metrics: Arc<MetricsRegistry>,
    health: Arc<HealthBoard>,
    audit: Arc<dyn AuditSink>,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider: Arc<dyn GenerativeProvider>,
        credentials: Vec<ProviderCredential>,
        models: Vec<String>,
        temperature: f32,
        attempt_timeout: Duration,
        metrics: Arc<MetricsRegistry>,
        health: Arc<HealthBoard>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            provider,
            credentials,
            models,
            temperature,
            attempt_timeout,
            metrics,
            health,
            audit,
        }
    }

    pub async fn generate(
        &self,
        request: SequenceRequest,
        user_email: &str,
    ) -> Result<GenerationOutcome, DomainError> {
        let request = request.validated()?;
        let ordered = self.ordered_credentials()?;

        let prompt = build_prompt(&request);
        let schema = response_schema();
        let generation_id = Uuid::new_v4();

        let mut attempts = 0usize;
        let mut last_error =
            DomainError::configuration("no generation attempt was made");

        for credential in &ordered {
            for model in &self.models {
                attempts += 1;
                self.metrics.record_request(credential.label());
                self.health.mark(model, ModelHealth::Checking);

                info!(
                    credential = credential.label(),
                    model = model.as_str(),
                    attempt = attempts,
                    "starting generation attempt"
                );

                let started = Instant::now();
                let result = self
                    .attempt(credential, model, &prompt, &schema)
                    .await;
                let duration_ms = started.elapsed().as_millis() as u64;

                match result {
                    Ok((sequence, raw)) => {
                        self.metrics.record_success(credential.label());
                        self.health.mark(model, ModelHealth::Online);
                        self.record_attempt(AttemptRecord::new(
                            generation_id,
                            credential.label(),
                            model,
                            AttemptOutcome::Success,
                            duration_ms,
                        ))
                        .await;
                        self.record_completion(CompletionRecord::new(
                            generation_id,
                            user_email,
                            model,
                            prompt.clone(),
                            raw,
                        ))
                        .await;

                        let mut sequence = sequence;
                        sequence.fill_header(&request);

                        info!(
                            credential = credential.label(),
                            model = model.as_str(),
                            attempts,
                            "generation succeeded"
                        );

                        return Ok(GenerationOutcome {
                            generation_id,
                            sequence,
                            credential_label: credential.label().to_string(),
                            model: model.clone(),
                            attempts,
                        });
                    }
                    Err(error) => {
                        self.metrics.record_error(credential.label());
                        self.health.mark(model, ModelHealth::Offline);

                        warn!(
                            credential = credential.label(),
                            model = model.as_str(),
                            class = ?classify(&error),
                            %error,
                            "generation attempt failed"
                        );

                        self.record_attempt(AttemptRecord::new(
                            generation_id,
                            credential.label(),
                            model,
                            AttemptOutcome::Error {
                                class: classify(&error),
                                message: error.to_string(),
                            },
                            duration_ms,
                        ))
                        .await;

                        last_error = error;
                    }
                }
            }
        }

        Err(DomainError::exhausted(attempts, last_error.to_string()))
    }

    /// Well-formed credentials, ascending by recorded request count.
    /// The sort is stable, so equally loaded credentials keep their
    /// configured order. Malformed credentials never reach the provider
    /// and never touch the counters.
    fn ordered_credentials(&self) -> Result<Vec<ProviderCredential>, DomainError> {
        let mut ordered: Vec<ProviderCredential> = Vec::new();
        for credential in &self.credentials {
            if credential.is_well_formed() {
                ordered.push(credential.clone());
            } else {
                warn!(
                    credential = credential.label(),
                    "skipping malformed credential"
                );
            }
        }
        if ordered.is_empty() {
            return Err(DomainError::configuration(
                "no well-formed credentials are configured",
            ));
        }
        ordered.sort_by_key(|c| self.metrics.requests_for(c.label()));
        Ok(ordered)
    }

    async fn attempt(
        &self,
        credential: &ProviderCredential,
        model: &str,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<(DidacticSequence, serde_json::Value), DomainError> {
        let call = ProviderCall {
            api_key: credential.key(),
            model,
            prompt,
            schema,
            temperature: self.temperature,
        };

        let raw = tokio::time::timeout(self.attempt_timeout, self.provider.generate(call))
            .await
            .map_err(|_| {
                DomainError::provider(
                    self.provider.name(),
                    format!(
                        "attempt timed out after {}s",
                        self.attempt_timeout.as_secs()
                    ),
                )
            })??;

        let sequence = DidacticSequence::from_provider_json(raw.clone())?;
        Ok((sequence, raw))
    }

    async fn record_attempt(&self, record: AttemptRecord) {
        if let Err(error) = self.audit.record_attempt(record).await {
            warn!(%error, "failed to persist attempt record");
        }
    }

    async fn record_completion(&self, record: CompletionRecord) {
        if let Err(error) = self.audit.record_completion(record).await {
            warn!(%error, "failed to persist completion record");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::domain::llm::{ErrorClass, MockProvider};
    use crate::domain::sequence::complete_response;

    struct RecordingSink {
        attempts: Mutex<Vec<AttemptRecord>>,
        completions: Mutex<Vec<CompletionRecord>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                attempts: Mutex::new(Vec::new()),
                completions: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AuditSink for RecordingSink {
        async fn record_attempt(&self, record: AttemptRecord) -> Result<(), DomainError> {
            self.attempts.lock().unwrap().push(record);
            Ok(())
        }

        async fn record_completion(&self, record: CompletionRecord) -> Result<(), DomainError> {
            self.completions.lock().unwrap().push(record);
            Ok(())
        }

        async fn recent_attempts(&self, limit: usize) -> Result<Vec<AttemptRecord>, DomainError> {
            let mut records = self.attempts.lock().unwrap().clone();
            records.reverse();
            records.truncate(limit);
            Ok(records)
        }
    }

    fn request() -> SequenceRequest {
        SequenceRequest {
            grado: "Quinto".to_string(),
            area: "Ciencias Naturales".to_string(),
            asignatura: "Biología".to_string(),
            tema: "Sistema Digestivo".to_string(),
            dba: String::new(),
            sesiones: 2,
            eje_crese: String::new(),
            grupos: "5A".to_string(),
            fecha: "2026-03-10".to_string(),
            docente_nombre: None,
            instruccion_refinamiento: None,
            respuesta_anterior: None,
        }
    }

    fn credential(label: &str, key: &str) -> ProviderCredential {
        ProviderCredential::new(label, key)
    }

    fn quota_error() -> DomainError {
        DomainError::provider_with_status("gemini", "quota exceeded", Some(429))
    }

    struct Harness {
        provider: Arc<MockProvider>,
        metrics: Arc<MetricsRegistry>,
        health: Arc<HealthBoard>,
        audit: Arc<RecordingSink>,
        orchestrator: Orchestrator,
    }

    fn harness(
        outcomes: Vec<Result<Value, DomainError>>,
        credentials: Vec<ProviderCredential>,
        models: Vec<&str>,
    ) -> Harness {
        let provider = Arc::new(MockProvider::new(outcomes));
        let metrics = Arc::new(MetricsRegistry::new(
            credentials.iter().map(|c| c.label().to_string()),
        ));
        let health = Arc::new(HealthBoard::new());
        let audit = Arc::new(RecordingSink::new());
        let orchestrator = Orchestrator::new(
            provider.clone(),
            credentials,
            models.into_iter().map(String::from).collect(),
            0.7,
            Duration::from_secs(45),
            metrics.clone(),
            health.clone(),
            audit.clone(),
        );
        Harness {
            provider,
            metrics,
            health,
            audit,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn test_least_loaded_credential_goes_first() {
        let creds = vec![
            credential("Laura", "AIzaLauraKey123456789012345"),
            credential("México", "AIzaMexicoKey12345678901234"),
        ];
        let h = harness(vec![Ok(complete_response())], creds, vec!["gemini-2.5-flash"]);

        // Laura has history, México is fresh.
        h.metrics.record_request("Laura");
        h.metrics.record_request("Laura");

        let outcome = h.orchestrator.generate(request(), "docente@test.edu").await.unwrap();
        assert_eq!(outcome.credential_label, "México");

        let calls = h.provider.calls.lock().unwrap();
        assert_eq!(calls[0].0, "AIzaMexicoKey12345678901234");
    }

    #[tokio::test]
    async fn test_ties_keep_configured_order() {
        let creds = vec![
            credential("Laura", "AIzaLauraKey123456789012345"),
            credential("México", "AIzaMexicoKey12345678901234"),
        ];
        let h = harness(vec![Ok(complete_response())], creds, vec!["gemini-2.5-flash"]);

        let outcome = h.orchestrator.generate(request(), "docente@test.edu").await.unwrap();
        assert_eq!(outcome.credential_label, "Laura");
    }

    #[tokio::test]
    async fn test_malformed_credentials_never_attempted() {
        let creds = vec![
            credential("Laura", "short"),
            credential("México", "AIzaMexicoKey12345678901234"),
        ];
        let h = harness(vec![Ok(complete_response())], creds, vec!["gemini-2.5-flash"]);

        let outcome = h.orchestrator.generate(request(), "docente@test.edu").await.unwrap();
        assert_eq!(outcome.credential_label, "México");
        assert_eq!(h.provider.call_count(), 1);
        assert_eq!(h.metrics.requests_for("Laura"), 0);
    }

    #[tokio::test]
    async fn test_no_usable_credentials_is_configuration_error() {
        let creds = vec![credential("Laura", ""), credential("México", "tiny")];
        let h = harness(vec![Ok(complete_response())], creds, vec!["gemini-2.5-flash"]);

        let err = h.orchestrator.generate(request(), "docente@test.edu").await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert_eq!(h.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        let creds = vec![credential("Laura", "AIzaLauraKey123456789012345")];
        let h = harness(
            vec![
                Err(quota_error()),
                Err(DomainError::provider("gemini", "internal server error")),
                Ok(complete_response()),
                Ok(complete_response()),
            ],
            creds,
            vec!["gemini-2.5-pro", "gemini-2.5-flash", "gemini-2.0-flash", "gemini-1.5-pro"],
        );

        let outcome = h.orchestrator.generate(request(), "docente@test.edu").await.unwrap();
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.model, "gemini-2.0-flash");
        assert_eq!(h.provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_schema_violation_is_retried_and_labeled() {
        let creds = vec![credential("Laura", "AIzaLauraKey123456789012345")];
        let h = harness(
            vec![Ok(json!({"tema_principal": "incomplete"})), Ok(complete_response())],
            creds,
            vec!["gemini-2.5-pro", "gemini-2.5-flash"],
        );

        let outcome = h.orchestrator.generate(request(), "docente@test.edu").await.unwrap();
        assert_eq!(outcome.attempts, 2);

        let attempts = h.audit.attempts.lock().unwrap();
        assert_eq!(attempts.len(), 2);
        match &attempts[0].outcome {
            AttemptOutcome::Error { class, message } => {
                assert_eq!(*class, ErrorClass::Recoverable);
                assert!(message.contains("Schema violation"));
            }
            other => panic!("expected error outcome, got {:?}", other),
        }
        assert!(matches!(attempts[1].outcome, AttemptOutcome::Success));
    }

    #[tokio::test]
    async fn test_metrics_reconcile_after_mixed_run() {
        let creds = vec![credential("Laura", "AIzaLauraKey123456789012345")];
        let h = harness(
            vec![Err(quota_error()), Ok(complete_response())],
            creds,
            vec!["gemini-2.5-pro", "gemini-2.5-flash"],
        );

        h.orchestrator.generate(request(), "docente@test.edu").await.unwrap();

        let usage = h
            .metrics
            .snapshot()
            .into_iter()
            .find(|u| u.label == "Laura")
            .unwrap();
        assert_eq!(usage.requests, 2);
        assert_eq!(usage.successes, 1);
        assert_eq!(usage.errors, 1);
        assert_eq!(usage.successes + usage.errors, usage.requests);
    }

    #[tokio::test]
    async fn test_exhaustion_carries_last_error_and_full_audit() {
        let creds = vec![
            credential("Laura", "AIzaLauraKey123456789012345"),
            credential("México", "AIzaMexicoKey12345678901234"),
        ];
        let h = harness(
            vec![
                Err(quota_error()),
                Err(quota_error()),
                Err(quota_error()),
                Err(DomainError::provider("gemini", "model is overloaded")),
            ],
            creds,
            vec!["gemini-2.5-pro", "gemini-2.5-flash"],
        );

        let err = h.orchestrator.generate(request(), "docente@test.edu").await.unwrap_err();
        match &err {
            DomainError::Exhausted { attempts, last_error } => {
                assert_eq!(*attempts, 4);
                assert!(last_error.contains("model is overloaded"));
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }

        let attempts = h.audit.recent_attempts(10).await.unwrap();
        assert_eq!(attempts.len(), 4);
        assert!(h.audit.completions.lock().unwrap().is_empty());

        // Offline is what the last attempt against each model observed.
        assert_eq!(
            h.health.status_of("gemini-2.5-flash"),
            Some(ModelHealth::Offline)
        );
    }

    #[tokio::test]
    async fn test_success_writes_completion_record() {
        let creds = vec![credential("Laura", "AIzaLauraKey123456789012345")];
        let h = harness(vec![Ok(complete_response())], creds, vec!["gemini-2.5-flash"]);

        let outcome = h.orchestrator.generate(request(), "docente@test.edu").await.unwrap();

        let completions = h.audit.completions.lock().unwrap();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].generation_id, outcome.generation_id);
        assert_eq!(completions[0].user_email, "docente@test.edu");
        assert_eq!(completions[0].model, "gemini-2.5-flash");
        assert!(completions[0].response.is_object());
    }

    #[tokio::test]
    async fn test_header_filled_from_request_on_success() {
        let creds = vec![credential("Laura", "AIzaLauraKey123456789012345")];
        let h = harness(vec![Ok(complete_response())], creds, vec!["gemini-2.5-flash"]);

        let outcome = h.orchestrator.generate(request(), "docente@test.edu").await.unwrap();
        assert_eq!(outcome.sequence.grado, "Quinto");
        assert!(!outcome.sequence.institucion.is_empty());
    }

    struct StalledProvider;

    #[async_trait]
    impl GenerativeProvider for StalledProvider {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn generate(&self, _call: ProviderCall<'_>) -> Result<Value, DomainError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(json!({}))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_attempt_times_out_and_exhausts() {
        let metrics = Arc::new(MetricsRegistry::new(["Laura".to_string()]));
        let health = Arc::new(HealthBoard::new());
        let audit = Arc::new(RecordingSink::new());
        let orchestrator = Orchestrator::new(
            Arc::new(StalledProvider),
            vec![credential("Laura", "AIzaLauraKey123456789012345")],
            vec!["gemini-2.5-flash".to_string()],
            0.7,
            Duration::from_secs(45),
            metrics.clone(),
            health,
            audit,
        );

        let err = orchestrator.generate(request(), "docente@test.edu").await.unwrap_err();
        match err {
            DomainError::Exhausted { attempts, last_error } => {
                assert_eq!(attempts, 1);
                assert!(last_error.contains("timed out after 45s"));
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
        assert_eq!(metrics.requests_for("Laura"), 1);
    }
}
