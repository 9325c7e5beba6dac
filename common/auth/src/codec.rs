use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use tracing::debug;

use crate::claims::{Claims, ClaimsRepr};
use crate::config::TokenConfig;
use crate::error::{AuthError, AuthResult};
use crate::key_store::SigningKeyStore;
use crate::roles::{authorities, Role};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and verifies HS256 bearer tokens.
///
/// Both directions are pure functions of the token, the active key and the
/// clock, so one codec is shared by every request without locking.
/// Signature comparison inside `jsonwebtoken` is constant-time.
#[derive(Clone)]
pub struct TokenCodec {
    config: TokenConfig,
    keys: Arc<SigningKeyStore>,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: TokenConfig, keys: Arc<SigningKeyStore>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }

        Self {
            config,
            keys,
            validation,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub fn issue(&self, username: &str, roles: &[Role]) -> AuthResult<String> {
        self.issue_at(username, roles, Utc::now())
    }

    pub fn issue_at(&self, username: &str, roles: &[Role], now: DateTime<Utc>) -> AuthResult<String> {
        if username.is_empty() {
            return Err(AuthError::Malformed);
        }

        let issued_at = now.timestamp();
        let expires_at = issued_at
            .checked_add(self.config.ttl_seconds)
            .filter(|exp| Utc.timestamp_opt(*exp, 0).single().is_some())
            .ok_or_else(|| {
                AuthError::Signing(format!(
                    "token lifetime of {}s is out of range",
                    self.config.ttl_seconds
                ))
            })?;
        let claims = ClaimsRepr {
            sub: username.to_string(),
            roles: authorities(roles),
            iat: issued_at,
            exp: expires_at,
            iss: self.config.issuer.clone(),
        };

        encode(
            &Header::new(ALGORITHM),
            &claims,
            self.keys.current_key().encoding(),
        )
        .map_err(|err| AuthError::Signing(err.to_string()))
    }

    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Structure, then signature, then expiry.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let data = decode::<ClaimsRepr>(token, self.keys.current_key().decoding(), &self.validation)?;
        let claims = Claims::try_from(data.claims)?;

        let deadline = claims.expires_at.timestamp() + i64::from(self.config.leeway_seconds);
        if now.timestamp() >= deadline {
            return Err(AuthError::Expired);
        }

        debug!(subject = %claims.subject, "verified token");
        Ok(claims)
    }
}
