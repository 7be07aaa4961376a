//! OpenAPI documentation for the REST routes. GraphQL is self-describing.

use utoipa::OpenApi;

use crate::api::{health, images};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog API",
        version = "0.1.0",
        description = "Image upload and probes for the blog GraphQL backend",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(images::upload_image, health::readiness_check),
    components(schemas(images::UploadResponse, axum_helpers::ErrorResponse, axum_helpers::ErrorCode)),
    tags(
        (name = "Images", description = "Post image upload"),
        (name = "Health", description = "Liveness and readiness")
    )
)]
pub struct ApiDoc;
