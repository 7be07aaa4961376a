//! GraphQL surface: `POST /graphql` executes, `GET /graphql` serves GraphiQL.
//!
//! `login` and `createUser` are public. Every other field requires the
//! [`AuthContext`] attached by the auth middleware to carry a user.

pub mod objects;
mod posts;
pub mod schema;
mod users;

pub use schema::{BlogSchema, MutationRoot, QueryRoot, build_schema};

use async_graphql::{Context, ErrorExtensions, http::GraphiQLSource};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension, Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};
use axum_helpers::{AppError, AuthContext, GraphQLResultExt};
use uuid::Uuid;

pub fn router(schema: BlogSchema) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .with_state(schema)
}

async fn graphql_handler(
    State(schema): State<BlogSchema>,
    auth: Option<Extension<AuthContext>>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let auth = auth.map(|Extension(ctx)| ctx).unwrap_or_default();
    schema.execute(request.into_inner().data(auth)).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// The authenticated caller, or 401 `Not authenticated!`
pub(crate) fn actor(ctx: &Context<'_>) -> async_graphql::Result<Uuid> {
    let anonymous = AuthContext::anonymous();
    let auth = ctx.data_opt::<AuthContext>().unwrap_or(&anonymous);
    let user_id = auth.require_user().extend_err()?;

    Uuid::parse_str(user_id)
        .map_err(|_| AppError::Unauthorized("Not authenticated!".to_string()).extend())
}
