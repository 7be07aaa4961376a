use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const ALLOWED_METHODS: [Method; 6] = [
    Method::OPTIONS,
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// Creates the CORS layer from a `CORS_ALLOWED_ORIGIN`-style value.
///
/// `None`, an empty value, or `*` allows any origin (without credentials).
/// Otherwise the value is a comma-separated origin list and credentials are
/// allowed so the `access_token` cookie can be sent.
///
/// Methods: OPTIONS, GET, POST, PUT, PATCH, DELETE.
/// Headers: Content-Type, Authorization.
///
/// # Errors
/// Returns `InvalidInput` if an origin is not a valid header value.
pub fn create_cors_layer(allowed_origins: Option<&str>) -> io::Result<CorsLayer> {
    let base = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600));

    let origins = allowed_origins.map(str::trim).unwrap_or_default();
    if origins.is_empty() || origins == "*" {
        tracing::info!("CORS configured to allow any origin");
        return Ok(base.allow_origin(Any));
    }

    let parsed = origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    tracing::info!("CORS configured with allowed origins: {}", origins);

    Ok(base
        .allow_origin(AllowOrigin::list(parsed))
        .allow_credentials(true))
}
