use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::{JwtAuth, validation_messages};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{AuthData, CreateUser, User};
use crate::repository::UserRepository;

/// Order in which registration failures are reported
const CREATE_USER_FIELDS: &[&str] = &["email", "password"];

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Register a new account.
    ///
    /// All input failures are collected before any lookup happens.
    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(validation_messages(&e, CREATE_USER_FIELDS)))?;

        if self.repository.email_exists(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(input.email, input.name, password_hash);

        self.repository.create(user).await
    }

    /// Check credentials and issue a signed token for the user
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> UserResult<AuthData> {
        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or_else(|| UserError::UnknownEmail(email.to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(UserError::WrongPassword);
        }

        let token = self
            .jwt
            .issue_token(&user.id.to_string(), &user.email)
            .map_err(|e| UserError::Token(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthData {
            token,
            user_id: user.id,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// The acting user, whose `status` field the caller reads
    pub async fn get_status(&self, actor: Uuid) -> UserResult<User> {
        self.get_user(actor).await
    }

    #[instrument(skip(self, status))]
    pub async fn update_status(&self, actor: Uuid, status: String) -> UserResult<User> {
        let mut user = self.get_user(actor).await?;

        user.status = status;
        user.updated_at = chrono::Utc::now();

        self.repository.update(user).await
    }

    /// Record `post_id` as created by `user_id`
    #[instrument(skip(self))]
    pub async fn attach_post(&self, user_id: Uuid, post_id: Uuid) -> UserResult<()> {
        if !self.repository.push_post(user_id, post_id).await? {
            return Err(UserError::NotFound(user_id));
        }
        Ok(())
    }

    /// Forget `post_id` on its creator. A missing creator is not an error.
    #[instrument(skip(self))]
    pub async fn detach_post(&self, user_id: Uuid, post_id: Uuid) -> UserResult<()> {
        if !self.repository.pull_post(user_id, post_id).await? {
            tracing::warn!("Creator no longer exists; nothing to detach");
        }
        Ok(())
    }
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
