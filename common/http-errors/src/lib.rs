use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

pub const ERROR_CODE_HEADER: &str = "X-Error-Code";
pub const ACCESS_DENIED: &str = "Access Denied";
const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Wire shape of every error response.
#[derive(Serialize, Debug, Clone)]
pub struct ErrorBody {
    pub path: String,
    pub status: u16,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn new(path: impl Into<String>, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized { code: &'static str, message: String },
    Forbidden,
    BadRequest { code: &'static str, message: String },
    NotFound { code: &'static str, message: String },
    Conflict { code: &'static str, message: String },
    Internal { message: String },
}

impl ApiError {
    /// Internal details are logged, never rendered.
    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal { message: e.to_string() }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest { code, message: message.into() }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound { code, message: message.into() }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict { code, message: message.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { code, .. }
            | ApiError::BadRequest { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Conflict { code, .. } => code,
            ApiError::Forbidden => "access_denied",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    fn public_message(self) -> String {
        match self {
            ApiError::Unauthorized { message, .. }
            | ApiError::BadRequest { message, .. }
            | ApiError::NotFound { message, .. }
            | ApiError::Conflict { message, .. } => message,
            ApiError::Forbidden => ACCESS_DENIED.to_string(),
            ApiError::Internal { message } => {
                error!(detail = %message, "internal error while handling request");
                INTERNAL_MESSAGE.to_string()
            }
        }
    }
}

/// Carried on the response so [`error_envelope`] can re-render with the request path.
#[derive(Debug, Clone)]
struct RenderedError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = self.public_message();

        let mut resp = (status, Json(ErrorBody::new("", status, message.clone()))).into_response();
        resp.extensions_mut().insert(RenderedError { status, message });
        if let Ok(val) = HeaderValue::from_str(code) {
            resp.headers_mut().insert(ERROR_CODE_HEADER, val);
        }
        resp
    }
}

/// Outermost middleware: fills `path` into error bodies produced by [`ApiError`].
pub async fn error_envelope(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let mut resp = next.run(req).await;

    let Some(rendered) = resp.extensions_mut().remove::<RenderedError>() else {
        return resp;
    };

    let code = resp.headers().get(ERROR_CODE_HEADER).cloned();
    let body = ErrorBody::new(path, rendered.status, rendered.message);
    let mut rebuilt = (rendered.status, Json(body)).into_response();
    if let Some(code) = code {
        rebuilt.headers_mut().insert(ERROR_CODE_HEADER, code);
    }
    rebuilt
}

pub type ApiResult<T> = Result<T, ApiError>;
