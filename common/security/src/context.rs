use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common_auth::{AuthError, Claims, Role};
use serde::Serialize;

/// Identity attached to a request once its bearer token has been verified.
/// Lives in the request extensions and is dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityContext {
    pub username: String,
    pub roles: Vec<Role>,
}

impl SecurityContext {
    pub fn new(username: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            username: username.into(),
            roles,
        }
    }
}

impl From<Claims> for SecurityContext {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.subject,
            roles: claims.roles,
        }
    }
}

/// Pulls the [`SecurityContext`] placed by the authenticate middleware.
/// Anonymous requests are rejected with 401.
pub struct SecurityCtxExtractor(pub SecurityContext);

#[async_trait]
impl<S> FromRequestParts<S> for SecurityCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(SecurityCtxExtractor)
            .ok_or(AuthError::MissingCredentials)
    }
}
