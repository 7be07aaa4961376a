use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{PostError, PostResult};
use crate::models::Post;

/// Repository trait for Post persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> PostResult<Post>;

    async fn get_by_id(&self, id: Uuid) -> PostResult<Option<Post>>;

    /// Newest first, skipping `offset` posts
    async fn list(&self, offset: u64, limit: u64) -> PostResult<Vec<Post>>;

    /// Total number of posts
    async fn count(&self) -> PostResult<u64>;

    /// All posts created by `creator`, newest first
    async fn list_by_creator(&self, creator: Uuid) -> PostResult<Vec<Post>>;

    /// Replace a stored post. Fails with `NotFound` if it does not exist.
    async fn update(&self, post: Post) -> PostResult<Post>;

    /// Returns false if nothing was deleted
    async fn delete(&self, id: Uuid) -> PostResult<bool>;
}

/// Lets callers pick a backend at runtime behind `Arc<dyn PostRepository>`
#[async_trait]
impl<T: PostRepository + ?Sized> PostRepository for Arc<T> {
    async fn create(&self, post: Post) -> PostResult<Post> {
        (**self).create(post).await
    }

    async fn get_by_id(&self, id: Uuid) -> PostResult<Option<Post>> {
        (**self).get_by_id(id).await
    }

    async fn list(&self, offset: u64, limit: u64) -> PostResult<Vec<Post>> {
        (**self).list(offset, limit).await
    }

    async fn count(&self) -> PostResult<u64> {
        (**self).count().await
    }

    async fn list_by_creator(&self, creator: Uuid) -> PostResult<Vec<Post>> {
        (**self).list_by_creator(creator).await
    }

    async fn update(&self, post: Post) -> PostResult<Post> {
        (**self).update(post).await
    }

    async fn delete(&self, id: Uuid) -> PostResult<bool> {
        (**self).delete(id).await
    }
}

/// In-memory implementation of PostRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryPostRepository {
    posts: Arc<RwLock<HashMap<Uuid, Post>>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: Post) -> PostResult<Post> {
        self.posts.write().await.insert(post.id, post.clone());
        tracing::info!(post_id = %post.id, "Created post");
        Ok(post)
    }

    async fn get_by_id(&self, id: Uuid) -> PostResult<Option<Post>> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn list(&self, offset: u64, limit: u64) -> PostResult<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        newest_first(&mut posts);

        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> PostResult<u64> {
        Ok(self.posts.read().await.len() as u64)
    }

    async fn list_by_creator(&self, creator: Uuid) -> PostResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.creator == creator)
            .cloned()
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn update(&self, post: Post) -> PostResult<Post> {
        let mut posts = self.posts.write().await;

        match posts.get_mut(&post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(post)
            }
            None => Err(PostError::NotFound(post.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> PostResult<bool> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }
}
