use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::User;
use crate::domain::DomainError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    async fn list(&self) -> Result<Vec<User>, DomainError>;

    async fn save(&self, user: User) -> Result<(), DomainError>;

    async fn update_password_hash(&self, id: Uuid, hash: &str) -> Result<(), DomainError>;

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError>;
}
