use super::context::AuthContext;
use super::jwt::JwtAuth;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Extract JWT from Authorization header or cookie
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    // Try Authorization header first: "Bearer <token>"
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .or_else(|| {
            // Fallback to cookie: "access_token=<token>"
            headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let (name, value) = cookie.trim().split_once('=')?;
                        (name == "access_token").then(|| value.to_string())
                    })
                })
        })
        .filter(|token| !token.is_empty())
}

/// Resolve the caller's identity from a request's headers.
///
/// Any failure (no token, bad signature, expired, empty subject) yields an
/// anonymous context.
pub fn resolve_identity(auth: &JwtAuth, headers: &HeaderMap) -> AuthContext {
    let Some(token) = extract_token_from_request(headers) else {
        return AuthContext::anonymous();
    };

    match auth.verify_token(&token) {
        Ok(claims) if !claims.sub.is_empty() => AuthContext::authenticated(claims.sub),
        Ok(_) => {
            tracing::debug!("JWT carried an empty subject");
            AuthContext::anonymous()
        }
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            AuthContext::anonymous()
        }
    }
}

/// Authentication middleware.
///
/// Never rejects. Inserts an [`AuthContext`] into the request extensions so
/// resolvers and extractors can enforce authentication where they need it.
///
/// ```ignore
/// let app = Router::new()
///     .route("/graphql", post(graphql_handler))
///     .layer(axum::middleware::from_fn_with_state(jwt_auth, auth_middleware));
/// ```
pub async fn auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = resolve_identity(&auth, request.headers());
    request.extensions_mut().insert(identity);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::{Extension, Router, body::Body, http::Request as HttpRequest, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("middleware-secret-that-is-32-chars!"))
    }

    async fn whoami(Extension(ctx): Extension<AuthContext>) -> String {
        ctx.user_id().unwrap_or("anonymous").to_string()
    }

    fn app(auth: JwtAuth) -> Router {
        Router::new()
            .route("/", get(whoami))
            .layer(axum::middleware::from_fn_with_state(auth, auth_middleware))
    }

    async fn call(app: Router, header: Option<(&str, String)>) -> String {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        assert_eq!(call(app(jwt()), None).await, "anonymous");
    }

    #[tokio::test]
    async fn test_valid_bearer_token_is_authenticated() {
        let auth = jwt();
        let token = auth.issue_token("user-42", "ada@example.com").unwrap();
        let body = call(app(auth), Some(("authorization", format!("Bearer {token}")))).await;
        assert_eq!(body, "user-42");
    }

    #[tokio::test]
    async fn test_cookie_fallback_is_authenticated() {
        let auth = jwt();
        let token = auth.issue_token("user-43", "ada@example.com").unwrap();
        let cookie = format!("theme=dark; access_token={token}");
        assert_eq!(call(app(auth), Some(("cookie", cookie))).await, "user-43");
    }

    #[tokio::test]
    async fn test_invalid_token_is_anonymous() {
        let body = call(
            app(jwt()),
            Some(("authorization", "Bearer not-a-token".to_string())),
        )
        .await;
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_anonymous() {
        let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-32-chars-ok"));
        let token = other.issue_token("user-42", "ada@example.com").unwrap();
        let body = call(app(jwt()), Some(("authorization", format!("Bearer {token}")))).await;
        assert_eq!(body, "anonymous");
    }

    #[test]
    fn test_extract_token_requires_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic abc".parse().unwrap());
        assert_eq!(extract_token_from_request(&headers), None);

        headers.insert("authorization", "Bearer ".parse().unwrap());
        assert_eq!(extract_token_from_request(&headers), None);
    }
}
