pub mod codes;
pub mod graphql;
pub mod handlers;

pub use codes::ErrorCode;
pub use graphql::GraphQLResultExt;

use axum::{
    Json,
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// - `code`: Integer error code for logging/monitoring (e.g., 1008)
/// - `error`: Machine-readable error identifier (e.g., "CONFLICT")
/// - `message`: Human-readable error message
/// - `details`: Optional additional error details (e.g., validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1008,
///   "error": "CONFLICT",
///   "message": "User exists already.",
///   "details": null
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// A single failed input check, in the order it was detected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InputError {
    pub message: String,
}

impl InputError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Application error type shared by the REST and GraphQL surfaces.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Multipart error: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0:?}")]
    InvalidInput(Vec<InputError>),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::SerdeJson(_) | AppError::Io(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::MultipartRejection(e) => e.status(),
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidInput(_) | AppError::UnprocessableEntity(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::SerdeJson(_) => ErrorCode::SerdeJsonError,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::JsonExtractorRejection(_) => ErrorCode::JsonExtraction,
            AppError::MultipartRejection(_) => ErrorCode::MultipartExtraction,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::Unauthorized(_) => ErrorCode::Unauthorized,
            AppError::Forbidden(_) => ErrorCode::Forbidden,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::InvalidInput(_) => ErrorCode::ValidationError,
            AppError::UnprocessableEntity(_) => ErrorCode::UnprocessableEntity,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }

    /// Client-facing message. Wrapped library errors are not exposed.
    pub fn message(&self) -> String {
        match self {
            AppError::SerdeJson(_) | AppError::Io(_) | AppError::InvalidInput(_) => {
                self.error_code().default_message().to_string()
            }
            AppError::JsonExtractorRejection(e) => e.body_text(),
            AppError::MultipartRejection(e) => e.body_text(),
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::UnprocessableEntity(msg)
            | AppError::InternalServerError(msg)
            | AppError::ServiceUnavailable(msg) => msg.clone(),
        }
    }

    /// Validation failures attached to an [`AppError::InvalidInput`]
    pub fn input_errors(&self) -> Option<&[InputError]> {
        match self {
            AppError::InvalidInput(errors) => Some(errors),
            _ => None,
        }
    }

    /// Emit a log line at a level matching the error's severity
    pub(crate) fn log(&self) {
        let code = self.error_code().code();
        if self.status_code().is_server_error() {
            tracing::error!(error_code = code, "{}", self);
        } else {
            tracing::info!(error_code = code, "{}", self);
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let code = self.error_code();
        let details = self
            .input_errors()
            .and_then(|errors| serde_json::to_value(errors).ok());

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message: self.message(),
            details,
        });

        (status, body).into_response()
    }
}

/// Flatten `validator` errors into ordered [`InputError`]s.
///
/// Fields listed in `field_order` come first, in that order; any other failing
/// fields follow alphabetically. Each failing check contributes its message,
/// falling back to the validator code when no message was set.
pub fn validation_messages(errors: &ValidationErrors, field_order: &[&str]) -> Vec<InputError> {
    let field_errors = errors.field_errors();

    let mut fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
    fields.sort_by_key(|field| {
        (
            field_order
                .iter()
                .position(|f| f == field)
                .unwrap_or(usize::MAX),
            field.to_string(),
        )
    });

    fields
        .into_iter()
        .filter_map(|field| field_errors.get(field))
        .flat_map(|errs| errs.iter())
        .map(|err| {
            InputError::new(
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string()),
            )
        })
        .collect()
}

/// Helper function to create error responses.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "Email is invalid"))]
        email: String,
        #[validate(length(min = 5, message = "Password is too short"))]
        password: String,
        #[validate(length(min = 1))]
        name: String,
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InvalidInput(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_io_error_message_is_generic() {
        let err = AppError::from(std::io::Error::other("disk on fire"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "I/O error occurred");
    }

    #[tokio::test]
    async fn test_not_found_response_body() {
        let response = AppError::NotFound("Post not found!".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["code"], 1004);
        assert_eq!(json["error"], "NOT_FOUND");
        assert_eq!(json["message"], "Post not found!");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_invalid_input_response_carries_details() {
        let err = AppError::InvalidInput(vec![InputError::new("Title is too short")]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Invalid input");
        assert_eq!(json["details"][0]["message"], "Title is too short");
    }

    #[test]
    fn test_validation_messages_follow_field_order() {
        let input = Signup {
            email: "not-an-email".into(),
            password: "abc".into(),
            name: String::new(),
        };
        let errors = input.validate().unwrap_err();

        let messages = validation_messages(&errors, &["email", "password"]);
        assert_eq!(
            messages,
            vec![
                InputError::new("Email is invalid"),
                InputError::new("Password is too short"),
                InputError::new("length"),
            ]
        );

        let reversed = validation_messages(&errors, &["password", "email"]);
        assert_eq!(reversed[0].message, "Password is too short");
    }
}
