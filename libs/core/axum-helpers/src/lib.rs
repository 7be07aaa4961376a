//! # Axum Helpers
//!
//! Shared building blocks for the blog HTTP services.
//!
//! ## Modules
//!
//! - **[`auth`]**: Stateless JWT issuance/verification and the request identity middleware
//! - **[`errors`]**: Structured error responses, error codes, GraphQL error extensions
//! - **[`extractors`]**: [`AuthUser`] for routes that require a caller
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: Router assembly, health checks, graceful shutdown

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{AuthContext, JwtAuth, JwtClaims, JwtConfig, auth_middleware};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{
    AppError, ErrorCode, ErrorResponse, GraphQLResultExt, InputError, validation_messages,
};

pub use extractors::AuthUser;
