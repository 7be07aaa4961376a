//! REST routes that sit beside the GraphQL endpoint.

pub mod health;
pub mod images;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .merge(images::router(state.clone()))
        .merge(health::router(state.clone()))
        .nest_service("/images", ServeDir::new(&state.blog.images_dir))
}
