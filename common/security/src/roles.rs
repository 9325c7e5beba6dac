use common_auth::{AuthError, Role};
use tracing::warn;

use crate::context::SecurityContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Access decision point: allow iff `required` is among the context's roles.
pub fn authorize(ctx: &SecurityContext, required: Role) -> Decision {
    if ctx.roles.contains(&required) {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Boundary form of [`authorize`] for handlers: a denial becomes
/// [`AuthError::Denied`], which renders as 403 before any business logic runs.
pub fn ensure_role(ctx: &SecurityContext, required: Role) -> Result<(), AuthError> {
    match authorize(ctx, required) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            warn!(username = %ctx.username, ?required, roles = ?ctx.roles, "role_check_failed");
            Err(AuthError::Denied)
        }
    }
}
