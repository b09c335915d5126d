//! Session endpoints: login, logout, profile and password change

use axum::{http::StatusCode, routing::get, routing::post, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::middleware::RequireUser;
use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::user::{Role, User};

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/password", post(change_password))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

async fn login(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(&body.email, &body.password)
        .await?;
    let token = state.jwt_service.generate(&user)?;

    info!(email = user.email.as_str(), "user logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserProfile::from(&user),
    }))
}

/// Tokens are stateless, so logout is a client-side discard. The
/// endpoint exists so the frontend has a single place to hook into.
async fn logout(RequireUser(user): RequireUser) -> StatusCode {
    info!(email = user.email.as_str(), "user logged out");
    StatusCode::NO_CONTENT
}

async fn me(RequireUser(user): RequireUser) -> Json<UserProfile> {
    Json(UserProfile::from(&user))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

async fn change_password(
    axum::extract::State(state): axum::extract::State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .change_password(user.id, &body.current_password, &body.new_password)
        .await?;

    info!(email = user.email.as_str(), "password changed");
    Ok(StatusCode::NO_CONTENT)
}
