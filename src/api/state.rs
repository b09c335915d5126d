//! Application state for shared services

use std::sync::Arc;

use crate::api::middleware::Debounce;
use crate::domain::audit::AuditSink;
use crate::domain::credentials::ProviderCredential;
use crate::domain::generation::Orchestrator;
use crate::domain::metrics::{HealthBoard, MetricsRegistry};
use crate::infrastructure::auth::JwtService;
use crate::infrastructure::export::DocxExporter;
use crate::infrastructure::user::UserService;

/// Shared services behind the handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub user_service: Arc<UserService>,
    pub jwt_service: Arc<JwtService>,
    pub metrics: Arc<MetricsRegistry>,
    pub health_board: Arc<HealthBoard>,
    pub audit: Arc<dyn AuditSink>,
    pub exporter: Arc<DocxExporter>,
    pub debounce: Arc<Debounce>,
    pub credentials: Vec<ProviderCredential>,
}
