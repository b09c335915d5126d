use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::PasswordHasher;
use crate::config::UserSeed;
use crate::domain::user::{Role, User, UserRepository};
use crate::domain::DomainError;

const MIN_PASSWORD_LEN: usize = 8;

/// Account operations: seeding from configuration, sign-in checks and
/// password changes. Failed sign-ins return the same error whether the
/// email or the password was wrong.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Create configured accounts that do not exist yet. Existing
    /// accounts keep their stored hash, so a restart never resets a
    /// changed password.
    pub async fn seed(&self, seeds: &[UserSeed]) -> Result<(), DomainError> {
        for seed in seeds {
            if self.repository.find_by_email(&seed.email).await?.is_some() {
                continue;
            }

            let role = if seed.admin { Role::Admin } else { Role::Docente };
            let hash = self.hasher.hash(&seed.password)?;
            self.repository
                .save(User::new(&seed.name, &seed.email, role, hash))
                .await?;

            info!(email = seed.email.as_str(), "seeded account");
        }
        Ok(())
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let mut user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::credential("invalid email or password"))?;

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(DomainError::credential("invalid email or password"));
        }

        if !user.is_active() {
            return Err(DomainError::credential("account is disabled"));
        }

        let now = Utc::now();
        self.repository.record_login(user.id, now).await?;
        user.last_login_at = Some(now);

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.repository.find_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    pub async fn change_password(
        &self,
        id: Uuid,
        current: &str,
        new: &str,
    ) -> Result<(), DomainError> {
        if new.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user does not exist"))?;

        if !self.hasher.verify(current, &user.password_hash) {
            return Err(DomainError::credential("current password is incorrect"));
        }

        let hash = self.hasher.hash(new)?;
        self.repository.update_password_hash(id, &hash).await
    }
}
