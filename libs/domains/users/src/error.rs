use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, InputError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("No user registered with email '{0}'")]
    UnknownEmail(String),

    #[error("Password is incorrect")]
    WrongPassword,

    #[error("Invalid input: {0:?}")]
    Validation(Vec<InputError>),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound("User not found!".to_string()),
            UserError::DuplicateEmail(_) => AppError::Conflict("User exists already.".to_string()),
            UserError::UnknownEmail(_) => AppError::NotFound("User does not exist!".to_string()),
            UserError::WrongPassword => {
                AppError::Unauthorized("Password is incorrect!".to_string())
            }
            UserError::Validation(errors) => AppError::InvalidInput(errors),
            UserError::PasswordHash(msg) | UserError::Token(msg) | UserError::Database(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}
