//! Authentication module.
//!
//! This module provides:
//! - Stateless HS256 token issuance and verification
//! - A non-rejecting middleware that attaches an [`AuthContext`] to every request
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let app = Router::new()
//!     .route("/graphql", post(graphql_handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, auth_middleware));
//! ```

pub mod config;
pub mod context;
pub mod jwt;
pub mod middleware;

pub use config::{DEFAULT_TOKEN_TTL_SECS, JwtConfig};
pub use context::AuthContext;
pub use jwt::{JwtAuth, JwtClaims};
pub use middleware::{auth_middleware, resolve_identity};
