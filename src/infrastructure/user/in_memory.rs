use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// In-memory user store keyed by lowercase email. Accounts come from
/// configuration at startup, so this is the default repository.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self
            .users
            .read()
            .map_err(|_| DomainError::storage("user store lock poisoned"))?;
        Ok(users.get(&email.to_lowercase()).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self
            .users
            .read()
            .map_err(|_| DomainError::storage("user store lock poisoned"))?;
        Ok(users.values().find(|u| u.id == id).cloned())
    }

    async fn save(&self, user: User) -> Result<(), DomainError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| DomainError::storage("user store lock poisoned"))?;
        users.insert(user.email.to_lowercase(), user);
        Ok(())
    }

    async fn update_password_hash(&self, id: Uuid, hash: &str) -> Result<(), DomainError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| DomainError::storage("user store lock poisoned"))?;
        let user = users
            .values_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::not_found("user does not exist"))?;
        user.password_hash = hash.to_string();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let users = self
            .users
            .read()
            .map_err(|_| DomainError::storage("user store lock poisoned"))?;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(all)
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| DomainError::storage("user store lock poisoned"))?;
        let user = users
            .values_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::not_found("user does not exist"))?;
        user.last_login_at = Some(at);
        Ok(())
    }
}
