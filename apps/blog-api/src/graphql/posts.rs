use async_graphql::{Context, ID, Object, Result};
use axum_helpers::GraphQLResultExt;
use domain_posts::PostError;
use uuid::Uuid;

use super::actor;
use super::objects::{PostDataObject, PostInputData, PostObject};
use crate::state::Posts;

/// Unparseable ids can never match a stored post
fn parse_post_id(id: &ID) -> Result<Uuid, PostError> {
    Uuid::parse_str(id.as_str()).map_err(|_| PostError::InvalidId(id.to_string()))
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// Newest posts first, paged
    async fn get_posts(&self, ctx: &Context<'_>, page: i32) -> Result<PostDataObject> {
        actor(ctx)?;
        let posts = ctx.data::<Posts>()?;
        posts
            .list_posts(i64::from(page))
            .await
            .map(PostDataObject::from)
            .extend_err()
    }

    async fn single_post(&self, ctx: &Context<'_>, post_id: ID) -> Result<PostObject> {
        actor(ctx)?;
        let posts = ctx.data::<Posts>()?;
        let id = parse_post_id(&post_id).extend_err()?;
        posts.get_post(id).await.map(PostObject).extend_err()
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(&self, ctx: &Context<'_>, post_input: PostInputData) -> Result<PostObject> {
        let actor = actor(ctx)?;
        let posts = ctx.data::<Posts>()?;
        posts
            .create_post(actor, post_input.into())
            .await
            .map(PostObject)
            .extend_err()
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        post_id: ID,
        post_input: PostInputData,
    ) -> Result<PostObject> {
        let actor = actor(ctx)?;
        let posts = ctx.data::<Posts>()?;
        let id = parse_post_id(&post_id).extend_err()?;
        posts
            .update_post(actor, id, post_input.into())
            .await
            .map(PostObject)
            .extend_err()
    }

    async fn delete_post(&self, ctx: &Context<'_>, post_id: ID) -> Result<bool> {
        let actor = actor(ctx)?;
        let posts = ctx.data::<Posts>()?;
        let id = parse_post_id(&post_id).extend_err()?;
        posts.delete_post(actor, id).await.extend_err()
    }
}
