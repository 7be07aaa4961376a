use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, InputError};
use domain_users::UserError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("Post not found: {0}")]
    NotFound(Uuid),

    #[error("Malformed post id: {0}")]
    InvalidId(String),

    #[error("Acting user does not exist")]
    InvalidUser,

    #[error("User is not the owner of the post ({action})")]
    NotOwner { action: &'static str },

    #[error("Delete of post {0} removed nothing")]
    DeleteFailed(Uuid),

    #[error("Invalid input: {0:?}")]
    Validation(Vec<InputError>),

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Image store error: {0}")]
    Image(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type PostResult<T> = Result<T, PostError>;

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound(_) | PostError::InvalidId(_) => {
                AppError::NotFound("Post not found!".to_string())
            }
            PostError::InvalidUser => AppError::Unauthorized("Invalid User".to_string()),
            PostError::NotOwner { action } => AppError::Forbidden(format!(
                "You are not owner of the post so you cannot {} this post!",
                action
            )),
            PostError::DeleteFailed(_) => {
                AppError::InternalServerError("Could not delete post".to_string())
            }
            PostError::Validation(errors) => AppError::InvalidInput(errors),
            PostError::User(e) => e.into(),
            PostError::Image(msg) | PostError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for PostError {
    fn from(err: mongodb::error::Error) -> Self {
        PostError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_ownership_messages() {
        let update: AppError = PostError::NotOwner { action: "update" }.into();
        assert_eq!(update.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            update.message(),
            "You are not owner of the post so you cannot update this post!"
        );

        let delete: AppError = PostError::NotOwner { action: "delete" }.into();
        assert_eq!(
            delete.message(),
            "You are not owner of the post so you cannot delete this post!"
        );
    }

    #[test]
    fn test_malformed_id_looks_like_missing_post() {
        let err: AppError = PostError::InvalidId("nope".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Post not found!");
    }

    #[test]
    fn test_invalid_user_and_delete_failure() {
        let err: AppError = PostError::InvalidUser.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Invalid User");

        let err: AppError = PostError::DeleteFailed(Uuid::nil()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Could not delete post");
    }
}
