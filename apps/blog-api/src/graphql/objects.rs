//! GraphQL output and input types, named as clients know them.

use async_graphql::{Context, ID, InputObject, Object, Result, SimpleObject};
use axum_helpers::GraphQLResultExt;
use chrono::{DateTime, SecondsFormat, Utc};
use domain_posts::{Post, PostInput, PostPage};
use domain_users::{AuthData, CreateUser, User};

use crate::state::{Posts, Users};

/// ISO-8601 UTC with milliseconds, e.g. `2024-05-01T10:00:00.000Z`
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct PostObject(pub Post);

#[Object(name = "Post")]
impl PostObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn content(&self) -> &str {
        &self.0.content
    }

    async fn image_url(&self) -> &str {
        &self.0.image_url
    }

    async fn creator(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let users = ctx.data::<Users>()?;
        users.get_user(self.0.creator).await.map(UserObject).extend_err()
    }

    async fn created_at(&self) -> String {
        iso_timestamp(&self.0.created_at)
    }

    async fn updated_at(&self) -> String {
        iso_timestamp(&self.0.updated_at)
    }
}

pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    /// Never revealed
    async fn password(&self) -> Option<String> {
        None
    }

    async fn status(&self) -> &str {
        &self.0.status
    }

    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostObject>> {
        let posts = ctx.data::<Posts>()?;
        let list = posts.posts_by_creator(self.0.id).await.extend_err()?;
        Ok(list.into_iter().map(PostObject).collect())
    }
}

#[derive(SimpleObject)]
#[graphql(name = "AuthData")]
pub struct AuthDataObject {
    pub token: String,
    pub user_id: String,
}

impl From<AuthData> for AuthDataObject {
    fn from(data: AuthData) -> Self {
        Self {
            token: data.token,
            user_id: data.user_id.to_string(),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "PostData")]
pub struct PostDataObject {
    pub posts: Vec<PostObject>,
    pub total_items: i32,
}

impl From<PostPage> for PostDataObject {
    fn from(page: PostPage) -> Self {
        Self {
            posts: page.posts.into_iter().map(PostObject).collect(),
            total_items: i32::try_from(page.total_items).unwrap_or(i32::MAX),
        }
    }
}

#[derive(InputObject)]
pub struct UserInputData {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl From<UserInputData> for CreateUser {
    fn from(input: UserInputData) -> Self {
        Self {
            email: input.email,
            name: input.name,
            password: input.password,
        }
    }
}

#[derive(InputObject)]
pub struct PostInputData {
    pub title: String,
    pub image_url: String,
    pub content: String,
}

impl From<PostInputData> for PostInput {
    fn from(input: PostInputData) -> Self {
        Self {
            title: input.title,
            content: input.content,
            image_url: input.image_url,
        }
    }
}
