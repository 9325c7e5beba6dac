use axum::response::{IntoResponse, Response};
use common_http_errors::ApiError;
use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Failure taxonomy of the auth subsystem. Only the kind is user-visible;
/// the payload of internal variants is logged and never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("token is not a well-formed signed structure")]
    Malformed,
    #[error("token signature does not match")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("request carries no credentials")]
    MissingCredentials,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("required role not granted")]
    Denied,
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("signing key unavailable: {0}")]
    KeyMaterial(String),
    #[error("credential backend failure: {0}")]
    Backend(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Malformed => "token_malformed",
            AuthError::BadSignature => "token_signature",
            AuthError::Expired => "token_expired",
            AuthError::MissingCredentials => "auth_required",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Denied => "access_denied",
            AuthError::Signing(_) | AuthError::KeyMaterial(_) | AuthError::Backend(_) => {
                "internal_error"
            }
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::Malformed => "Malformed authentication token",
            AuthError::BadSignature => "Invalid token signature",
            AuthError::Expired => "Authentication token has expired",
            AuthError::MissingCredentials => {
                "Full authentication is required to access this resource"
            }
            AuthError::InvalidCredentials => "Invalid username or password",
            AuthError::Denied => common_http_errors::ACCESS_DENIED,
            AuthError::Signing(_) | AuthError::KeyMaterial(_) | AuthError::Backend(_) => {
                "Internal Server Error"
            }
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Signing(_) | AuthError::KeyMaterial(_) | AuthError::Backend(_)
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        match value.kind() {
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Denied => ApiError::Forbidden,
            AuthError::Signing(_) | AuthError::KeyMaterial(_) | AuthError::Backend(_) => {
                ApiError::internal(value)
            }
            other => ApiError::Unauthorized {
                code: other.code(),
                message: other.public_message().to_string(),
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn token_failures_are_unauthorized() {
        for err in [AuthError::Malformed, AuthError::BadSignature, AuthError::Expired] {
            let resp = err.clone().into_response();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(resp.headers().get("X-Error-Code").unwrap(), err.code());
        }
    }

    #[test]
    fn denied_is_forbidden_not_unauthorized() {
        let resp = AuthError::Denied.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_failures_map_to_500() {
        let resp = AuthError::Backend("pool timed out".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(AuthError::KeyMaterial("short".into()).is_internal());
    }

    #[test]
    fn jwt_kinds_are_classified() {
        let sig: jsonwebtoken::errors::Error = ErrorKind::InvalidSignature.into();
        assert_eq!(AuthError::from(sig), AuthError::BadSignature);
        let exp: jsonwebtoken::errors::Error = ErrorKind::ExpiredSignature.into();
        assert_eq!(AuthError::from(exp), AuthError::Expired);
        let token: jsonwebtoken::errors::Error = ErrorKind::InvalidToken.into();
        assert_eq!(AuthError::from(token), AuthError::Malformed);
    }
}
