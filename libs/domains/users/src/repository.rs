use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `DuplicateEmail` if the email is taken.
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Exact-match email lookup
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> UserResult<bool>;

    /// Replace a stored user. Fails with `NotFound` if it does not exist.
    async fn update(&self, user: User) -> UserResult<User>;

    /// Append `post_id` to the user's posts. Returns false if the user does not exist.
    async fn push_post(&self, user_id: Uuid, post_id: Uuid) -> UserResult<bool>;

    /// Remove `post_id` from the user's posts. Returns false if the user does not exist.
    async fn pull_post(&self, user_id: Uuid, post_id: Uuid) -> UserResult<bool>;
}

/// Lets callers pick a backend at runtime behind `Arc<dyn UserRepository>`
#[async_trait]
impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    async fn create(&self, user: User) -> UserResult<User> {
        (**self).create(user).await
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        (**self).get_by_id(id).await
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        (**self).get_by_email(email).await
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        (**self).email_exists(email).await
    }

    async fn update(&self, user: User) -> UserResult<User> {
        (**self).update(user).await
    }

    async fn push_post(&self, user_id: Uuid, post_id: Uuid) -> UserResult<bool> {
        (**self).push_post(user_id, post_id).await
    }

    async fn pull_post(&self, user_id: Uuid, post_id: Uuid) -> UserResult<bool> {
        (**self).pull_post(user_id, post_id).await
    }
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(UserError::NotFound(user.id)),
        }
    }

    async fn push_post(&self, user_id: Uuid, post_id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        Ok(match users.get_mut(&user_id) {
            Some(user) => {
                user.posts.push(post_id);
                user.updated_at = chrono::Utc::now();
                true
            }
            None => false,
        })
    }

    async fn pull_post(&self, user_id: Uuid, post_id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        Ok(match users.get_mut(&user_id) {
            Some(user) => {
                user.posts.retain(|id| *id != post_id);
                user.updated_at = chrono::Utc::now();
                true
            }
            None => false,
        })
    }
}
