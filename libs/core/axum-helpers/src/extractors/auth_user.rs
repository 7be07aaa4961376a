use crate::auth::AuthContext;
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// The authenticated caller's user id.
///
/// Reads the [`AuthContext`] left by [`crate::auth::auth_middleware`] and
/// rejects anonymous requests with 401 `Not authenticated.`. A request that
/// never passed through the middleware counts as anonymous.
///
/// ```ignore
/// async fn upload(AuthUser(user_id): AuthUser, multipart: Multipart) -> Result<Response, AppError> {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .and_then(|ctx| ctx.user_id())
            .map(|id| AuthUser(id.to_string()))
            .ok_or_else(|| AppError::Unauthorized("Not authenticated.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn extract(ctx: Option<AuthContext>) -> Result<AuthUser, AppError> {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        if let Some(ctx) = ctx {
            request.extensions_mut().insert(ctx);
        }
        let (mut parts, _) = request.into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_authenticated_context_extracts_user() {
        let user = extract(Some(AuthContext::authenticated("user-9"))).await.unwrap();
        assert_eq!(user, AuthUser("user-9".to_string()));
    }

    #[tokio::test]
    async fn test_anonymous_context_is_rejected() {
        let err = extract(Some(AuthContext::anonymous())).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Not authenticated.");
    }

    #[tokio::test]
    async fn test_missing_context_is_rejected() {
        let err = extract(None).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
