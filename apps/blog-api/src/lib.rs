//! Blog backend: a GraphQL API for users and posts, plus image upload.
//!
//! ```text
//! POST /graphql      queries and mutations
//! GET  /graphql      GraphiQL
//! PUT  /post-image   multipart upload (authenticated)
//! GET  /images/*     stored images
//! GET  /health       liveness
//! GET  /ready        MongoDB ping
//! ```

pub mod api;
pub mod config;
pub mod graphql;
pub mod openapi;
pub mod router;
pub mod state;

pub use config::{BlogConfig, Config};
pub use router::build_router;
pub use state::AppState;
