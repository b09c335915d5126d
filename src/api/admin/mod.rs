//! Admin dashboard endpoints: usage counters, model health, audit log

use axum::extract::{Query, State};
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};

use super::middleware::RequireAdmin;
use super::state::AppState;
use super::types::{ApiError, Json};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::audit::AttemptRecord;
use crate::domain::metrics::{CredentialUsage, HealthSnapshot};
use crate::domain::user::{Role, User, UserStatus};

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/usage", get(usage))
        .route("/logs", get(logs))
        .route("/users", get(users))
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub credentials: Vec<CredentialUsage>,
    pub models: Vec<HealthSnapshot>,
}

async fn usage(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<UsageResponse> {
    Json(UsageResponse {
        credentials: state.metrics.snapshot(),
        models: state.health_board.snapshot(),
    })
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub attempts: Vec<AttemptRecord>,
}

async fn logs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, ApiError> {
    // Cap so a bad query cannot drag the whole attempt table over.
    let limit = query.limit.min(500);
    let attempts = state.audit.recent_attempts(limit).await?;
    Ok(Json(LogsResponse { attempts }))
}

/// Account roster entry. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

async fn users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state
        .user_service
        .list()
        .await?
        .into_iter()
        .map(UserSummary::from)
        .collect();
    Ok(Json(UsersResponse { users }))
}
