use axum_helpers::validation_messages;
use domain_users::{UserError, UserRepository, UserService};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{PostError, PostResult};
use crate::images::ImageStore;
use crate::models::{Post, PostInput, PostPage};
use crate::repository::PostRepository;

pub const DEFAULT_POSTS_PER_PAGE: u64 = 2;

/// Order in which post input failures are reported
const POST_INPUT_FIELDS: &[&str] = &["title", "content"];

/// Service layer for Post business logic.
///
/// Every mutating operation takes the acting user's id, already proven by the
/// caller, and checks ownership against it.
#[derive(Clone)]
pub struct PostService<P: PostRepository, U: UserRepository> {
    repository: Arc<P>,
    users: UserService<U>,
    images: Arc<dyn ImageStore>,
    per_page: u64,
}

impl<P: PostRepository, U: UserRepository> PostService<P, U> {
    pub fn new(repository: P, users: UserService<U>, images: Arc<dyn ImageStore>) -> Self {
        Self {
            repository: Arc::new(repository),
            users,
            images,
            per_page: DEFAULT_POSTS_PER_PAGE,
        }
    }

    /// Page size for [`Self::list_posts`]; zero is treated as one
    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    #[instrument(skip(self, input))]
    pub async fn create_post(&self, actor: Uuid, input: PostInput) -> PostResult<Post> {
        validate(&input)?;

        self.users.get_user(actor).await.map_err(|e| match e {
            UserError::NotFound(_) => PostError::InvalidUser,
            other => other.into(),
        })?;

        let post = self.repository.create(Post::new(input, actor)).await?;
        if let Err(e) = self.users.attach_post(actor, post.id).await {
            tracing::warn!(post_id = %post.id, "Could not link post to its creator, removing it: {}", e);
            if let Err(cleanup) = self.repository.delete(post.id).await {
                tracing::error!(post_id = %post.id, "Failed to remove unlinked post: {}", cleanup);
            }
            return Err(e.into());
        }

        tracing::info!(post_id = %post.id, "Post created");
        Ok(post)
    }

    /// One page of the feed, newest first. Pages start at 1; lower values mean 1.
    #[instrument(skip(self))]
    pub async fn list_posts(&self, page: i64) -> PostResult<PostPage> {
        let page = u64::try_from(page.max(1)).unwrap_or(1);
        let offset = (page - 1).saturating_mul(self.per_page);

        let total_items = self.repository.count().await?;
        let posts = self.repository.list(offset, self.per_page).await?;

        Ok(PostPage { posts, total_items })
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, id: Uuid) -> PostResult<Post> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id))
    }

    #[instrument(skip(self, input))]
    pub async fn update_post(&self, actor: Uuid, id: Uuid, input: PostInput) -> PostResult<Post> {
        validate(&input)?;

        let mut post = self.get_post(id).await?;
        if !post.is_owned_by(actor) {
            return Err(PostError::NotOwner { action: "update" });
        }

        post.apply_update(input);
        self.repository.update(post).await
    }

    /// Delete a post, its image, and its entry on the creator
    #[instrument(skip(self))]
    pub async fn delete_post(&self, actor: Uuid, id: Uuid) -> PostResult<bool> {
        let post = self.get_post(id).await?;
        if !post.is_owned_by(actor) {
            return Err(PostError::NotOwner { action: "delete" });
        }

        if let Err(e) = self.images.remove(&post.image_url).await {
            tracing::warn!(image = %post.image_url, "Failed to clear post image: {}", e);
        }

        if !self.repository.delete(id).await? {
            return Err(PostError::DeleteFailed(id));
        }

        self.users.detach_post(post.creator, id).await?;

        tracing::info!("Post deleted");
        Ok(true)
    }

    /// Posts written by `creator`, newest first
    pub async fn posts_by_creator(&self, creator: Uuid) -> PostResult<Vec<Post>> {
        self.repository.list_by_creator(creator).await
    }
}

fn validate(input: &PostInput) -> PostResult<()> {
    input
        .validate()
        .map_err(|e| PostError::Validation(validation_messages(&e, POST_INPUT_FIELDS)))
}
