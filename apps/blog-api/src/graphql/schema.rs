use async_graphql::{EmptySubscription, MergedObject, Schema};

use super::posts::{PostMutation, PostQuery};
use super::users::{UserMutation, UserQuery};
use crate::state::AppState;

#[derive(MergedObject, Default)]
#[graphql(name = "RootQuery")]
pub struct QueryRoot(UserQuery, PostQuery);

#[derive(MergedObject, Default)]
#[graphql(name = "RootMutation")]
pub struct MutationRoot(UserMutation, PostMutation);

pub type BlogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: &AppState) -> BlogSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(state.users.clone())
        .data(state.posts.clone())
        .finish()
}
