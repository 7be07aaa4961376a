//! GraphQL projection of [`AppError`].
//!
//! Resolver errors carry the client message plus two extensions:
//! `statusCode` (the HTTP-equivalent status) and, for input validation
//! failures, `data` with the list of `{ message }` entries.

use super::AppError;
use async_graphql::ErrorExtensions;

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        self.log();

        async_graphql::Error::new(self.message()).extend_with(|_, e| {
            e.set("statusCode", self.status_code().as_u16());
            if let Some(errors) = self.input_errors() {
                match async_graphql::to_value(errors) {
                    Ok(data) => e.set("data", data),
                    Err(err) => tracing::warn!("Failed to encode input errors: {}", err),
                }
            }
        })
    }
}

/// Convert domain results into GraphQL results with status extensions.
///
/// ```ignore
/// async fn single_post(&self, ctx: &Context<'_>, post_id: ID) -> async_graphql::Result<Post> {
///     service.get_post(&post_id).await.extend_err()
/// }
/// ```
pub trait GraphQLResultExt<T> {
    fn extend_err(self) -> async_graphql::Result<T>;
}

impl<T, E> GraphQLResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn extend_err(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.into().extend())
    }
}
