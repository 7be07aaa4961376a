use axum::{Router, middleware};
use axum_helpers::{auth_middleware, create_cors_layer, create_router, health_router};
use std::io;

use crate::api;
use crate::graphql::{self, build_schema};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// The complete HTTP surface.
///
/// Every route except `/health` and the docs sees the caller's
/// [`axum_helpers::AuthContext`]; the middleware never rejects on its own.
pub fn build_router(state: &AppState) -> io::Result<Router> {
    let routes = Router::new()
        .merge(graphql::router(build_schema(state)))
        .merge(api::routes(state))
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ));

    let cors = create_cors_layer(state.blog.cors_allowed_origin.as_deref())?;

    Ok(create_router::<ApiDoc>(routes, cors).merge(health_router(state.app)))
}
