//! Secuencia Gateway
//!
//! Generation service for institutional didactic sequences:
//! - Multi-credential, multi-model fallback against a generative provider
//! - Per-credential usage counters and a model health board
//! - Attempt-level audit trail with an optional Postgres sink
//! - Word export of the generated document

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use api::middleware::Debounce;
use api::state::AppState;
use domain::audit::AuditSink;
use domain::credentials::ProviderCredential;
use domain::generation::Orchestrator;
use domain::metrics::{HealthBoard, MetricsRegistry};
use infrastructure::audit::{InMemoryAuditSink, PostgresAuditSink};
use infrastructure::auth::JwtService;
use infrastructure::export::DocxExporter;
use infrastructure::llm::{GeminiProvider, HttpClient};
use infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

/// Wire every service from configuration.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let generation = &config.generation;

    let metrics = Arc::new(MetricsRegistry::new(
        generation.credentials.iter().map(|c| c.label.clone()),
    ));
    let health_board = Arc::new(HealthBoard::new());

    let audit: Arc<dyn AuditSink> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            info!("Audit sink: Postgres");
            Arc::new(PostgresAuditSink::new(pool))
        }
        None => {
            info!("Audit sink: in-memory");
            Arc::new(InMemoryAuditSink::new())
        }
    };

    let credentials = ProviderCredential::from_config(&generation.credentials);
    let usable = credentials.iter().filter(|c| c.is_well_formed()).count();
    info!(
        configured = credentials.len(),
        usable, "credentials resolved from environment"
    );

    let provider = Arc::new(GeminiProvider::new(
        Arc::new(HttpClient::new()),
        generation.provider_base_url.clone(),
    ));

    let orchestrator = Arc::new(Orchestrator::new(
        provider,
        credentials.clone(),
        generation.models.clone(),
        generation.temperature,
        Duration::from_secs(generation.attempt_timeout_secs),
        metrics.clone(),
        health_board.clone(),
        audit.clone(),
    ));

    let user_service = Arc::new(UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2Hasher::new()),
    ));
    user_service.seed(&config.users).await?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt));
    let debounce = Arc::new(Debounce::new(Duration::from_secs(generation.debounce_secs)));

    Ok(AppState {
        orchestrator,
        user_service,
        jwt_service,
        metrics,
        health_board,
        audit,
        exporter: Arc::new(DocxExporter::new()),
        debounce,
        credentials,
    })
}
