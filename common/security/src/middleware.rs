use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use common_auth::{bearer_from_headers, AuthError, TokenCodec};
use tracing::{debug, warn};

use crate::context::SecurityContext;
use crate::policy::AccessPolicy;

/// State for [`authenticate`]; cheap to clone.
#[derive(Clone)]
pub struct RequestAuthenticator {
    codec: Arc<TokenCodec>,
    policy: Arc<AccessPolicy>,
}

impl RequestAuthenticator {
    pub fn new(codec: Arc<TokenCodec>, policy: Arc<AccessPolicy>) -> Self {
        Self { codec, policy }
    }

    /// Resolves the identity for a request. `Ok(None)` is an anonymous caller
    /// on a public route.
    pub fn identify(&self, req: &Request) -> Result<Option<SecurityContext>, AuthError> {
        match bearer_from_headers(req.headers())? {
            Some(token) => {
                let claims = self.codec.verify(&token)?;
                Ok(Some(SecurityContext::from(claims)))
            }
            None if self.policy.is_public(req.method(), req.uri().path()) => Ok(None),
            None => Err(AuthError::MissingCredentials),
        }
    }
}

/// Runs once per request ahead of every handler. A presented token is always
/// verified, public route or not; any failure ends the request with 401.
pub async fn authenticate(
    State(auth): State<RequestAuthenticator>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match auth.identify(&req) {
        Ok(Some(ctx)) => {
            debug!(username = %ctx.username, roles = ?ctx.roles, "request authenticated");
            req.extensions_mut().insert(ctx);
        }
        Ok(None) => {}
        Err(err) => {
            warn!(
                code = err.code(),
                method = %req.method(),
                path = %req.uri().path(),
                "authentication rejected"
            );
            return Err(err);
        }
    }

    Ok(next.run(req).await)
}
