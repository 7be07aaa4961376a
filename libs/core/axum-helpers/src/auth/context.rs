use crate::errors::AppError;

/// Identity attached to every request by [`super::auth_middleware`].
///
/// Anonymous requests still carry a context; resolvers decide whether they
/// need an authenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    user_id: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The caller's user id, or 401 `Not authenticated!`
    pub fn require_user(&self) -> Result<&str, AppError> {
        self.user_id
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated!".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_anonymous_context_is_rejected() {
        let ctx = AuthContext::anonymous();
        assert!(!ctx.is_authenticated());

        let err = ctx.require_user().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Not authenticated!");
    }

    #[test]
    fn test_authenticated_context_yields_user_id() {
        let ctx = AuthContext::authenticated("user-7");
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.require_user().unwrap(), "user-7");
    }
}
