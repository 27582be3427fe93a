//! User service: registration, login, preferences and account management.

use std::str::FromStr;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::rngs::OsRng;

use sitehub_domain::admin::AdminLevel;
use sitehub_domain::error::{NotFoundError, SiteError, ValidationError};
use sitehub_domain::id::UserId;
use sitehub_domain::user::{Language, User, check_password, normalize_username};

use crate::ports::UserRepository;

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
struct PasswordHashError(String);

fn hash_password(password: &str) -> Result<String, SiteError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SiteError::Internal(Box::new(PasswordHashError(e.to_string()))))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Whether `user_id` names a registered account. Anonymous client ids
/// that are not account ids simply return `false`.
///
/// # Errors
///
/// Returns a storage error propagated from the repository.
pub async fn user_exists<U: UserRepository>(users: &U, user_id: &str) -> Result<bool, SiteError> {
    let Ok(id) = UserId::from_str(user_id) else {
        return Ok(false);
    };
    Ok(users.get_by_id(id).await?.is_some())
}

/// Changes applied by a super admin to an account.
#[derive(Debug, Default, Clone)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Application service for registered accounts.
pub struct UserService<R> {
    repo: R,
}

impl<R: UserRepository + Send + Sync> UserService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    async fn get_user(&self, id: UserId) -> Result<User, SiteError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "User",
                    id: id.to_string(),
                }
                .into()
            })
    }

    async fn ensure_available(&self, username: &str) -> Result<(), SiteError> {
        if self.repo.find_by_username(username).await?.is_some() {
            return Err(ValidationError::UsernameTaken.into());
        }
        Ok(())
    }

    /// Create an account with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when the username or password is out
    /// of bounds or the username is taken, or a storage error.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, SiteError> {
        let username = normalize_username(username)?;
        check_password(password)?;
        self.ensure_available(&username).await?;

        let user = User::new(&username, hash_password(password)?)?;
        let created = self.repo.create(user).await?;
        tracing::info!(user_id = %created.id, username = %created.username, "user registered");
        Ok(created)
    }

    /// Check credentials and return the matching account.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCredentials`] for an unknown user or
    /// a wrong password, or a storage error.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, SiteError> {
        let user = self
            .repo
            .find_by_username(username.trim())
            .await?
            .filter(|user| verify_password(password, &user.password_hash));
        match user {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(username = %username.trim(), "failed login");
                Err(ValidationError::InvalidCredentials.into())
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown user, or a storage error.
    pub async fn get_language(&self, id: UserId) -> Result<Language, SiteError> {
        Ok(self.get_user(id).await?.preferred_language)
    }

    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown user,
    /// [`SiteError::Validation`] for an unsupported language, or a storage error.
    pub async fn set_language(&self, id: UserId, language: &str) -> Result<Language, SiteError> {
        let language = Language::from_str(language)?;
        let mut user = self.get_user(id).await?;
        user.preferred_language = language;
        self.repo.update(user).await?;
        Ok(language)
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without the super admin code, or a storage error.
    pub async fn list_users(&self, level: AdminLevel) -> Result<Vec<User>, SiteError> {
        level.require_super_admin()?;
        self.repo.get_all().await
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without the super admin code, otherwise
    /// the same errors as [`UserService::register`].
    pub async fn create_user(
        &self,
        level: AdminLevel,
        username: &str,
        password: &str,
    ) -> Result<User, SiteError> {
        level.require_super_admin()?;
        self.register(username, password).await
    }

    /// Rename an account and/or reset its password.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without the super admin code,
    /// [`SiteError::NotFound`] for an unknown user, [`SiteError::Validation`]
    /// for an invalid or taken username or a short password, or a storage error.
    pub async fn update_user(
        &self,
        level: AdminLevel,
        id: UserId,
        update: UserUpdate,
    ) -> Result<User, SiteError> {
        level.require_super_admin()?;
        let mut user = self.get_user(id).await?;

        if let Some(username) = update.username {
            let username = normalize_username(&username)?;
            if username != user.username {
                self.ensure_available(&username).await?;
                user.username = username;
            }
        }
        if let Some(password) = update.password {
            check_password(&password)?;
            user.password_hash = hash_password(&password)?;
        }

        let updated = self.repo.update(user).await?;
        tracing::info!(user_id = %updated.id, "user updated by super admin");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Forbidden`] without the super admin code,
    /// [`SiteError::NotFound`] for an unknown user, or a storage error.
    pub async fn delete_user(&self, level: AdminLevel, id: UserId) -> Result<(), SiteError> {
        level.require_super_admin()?;
        if !self.repo.delete(id).await? {
            return Err(NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into());
        }
        tracing::info!(user_id = %id, "user deleted by super admin");
        Ok(())
    }
}
