use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Application-focused representation of verified token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub subject: String,
    pub roles: Vec<Role>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Convenience helper for role checks.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Signed payload. Timestamps are Unix epoch seconds.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ClaimsRepr {
    pub sub: String,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        if value.sub.is_empty() {
            return Err(AuthError::Malformed);
        }

        let roles = value
            .roles
            .iter()
            .map(|raw| Role::from_authority(raw).ok_or(AuthError::Malformed))
            .collect::<AuthResult<Vec<_>>>()?;

        let issued_at = epoch_seconds(value.iat)?;
        let expires_at = epoch_seconds(value.exp)?;
        if expires_at < issued_at {
            return Err(AuthError::Malformed);
        }

        Ok(Self {
            subject: value.sub,
            roles,
            issued_at,
            expires_at,
        })
    }
}

fn epoch_seconds(value: i64) -> AuthResult<DateTime<Utc>> {
    Utc.timestamp_opt(value, 0)
        .single()
        .ok_or(AuthError::Malformed)
}
