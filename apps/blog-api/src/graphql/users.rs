use async_graphql::{Context, Object, Result};
use axum_helpers::GraphQLResultExt;

use super::actor;
use super::objects::{AuthDataObject, UserInputData, UserObject};
use crate::state::Users;

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Exchange credentials for a bearer token
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<AuthDataObject> {
        let users = ctx.data::<Users>()?;
        users
            .login(&email, &password)
            .await
            .map(AuthDataObject::from)
            .extend_err()
    }

    async fn get_user_status(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let actor = actor(ctx)?;
        let users = ctx.data::<Users>()?;
        users.get_status(actor).await.map(UserObject).extend_err()
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(&self, ctx: &Context<'_>, user_input: UserInputData) -> Result<UserObject> {
        let users = ctx.data::<Users>()?;
        users
            .create_user(user_input.into())
            .await
            .map(UserObject)
            .extend_err()
    }

    async fn update_user_status(&self, ctx: &Context<'_>, status: String) -> Result<UserObject> {
        let actor = actor(ctx)?;
        let users = ctx.data::<Users>()?;
        users
            .update_status(actor, status)
            .await
            .map(UserObject)
            .extend_err()
    }
}
