use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use common_auth::AuthError;
use once_cell::sync::Lazy;
use rand_core::OsRng;
use tracing::{debug, warn};

use crate::identity::{IdentityResolver, ResolveError};
use crate::models::Identity;

/// Verified in place of a real hash when the username is unknown, so both
/// failure paths pay for one Argon2 verification.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_blocking("catalog-dummy-password").ok());

fn hash_blocking(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

fn verify_blocking(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            warn!(error = %err, "stored password hash is not a valid PHC string");
            false
        }
    }
}

/// Hashes off the async workers.
pub async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|err| AuthError::Backend(err.to_string()))?
        .map_err(|err| AuthError::Backend(format!("failed to hash password: {err}")))
}

/// `None` verifies against the dummy hash and always reports a mismatch.
async fn check_password(password: &str, stored: Option<String>) -> Result<bool, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || match stored {
        Some(stored) => verify_blocking(&password, &stored),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                verify_blocking(&password, dummy);
            }
            false
        }
    })
    .await
    .map_err(|err| AuthError::Backend(err.to_string()))
}

#[derive(Clone)]
pub struct CredentialVerifier {
    resolver: IdentityResolver,
}

impl CredentialVerifier {
    pub fn new(resolver: IdentityResolver) -> Self {
        Self { resolver }
    }

    /// Unknown user and wrong password both yield [`AuthError::InvalidCredentials`].
    pub async fn verify(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = match self.resolver.resolve(username).await {
            Ok(identity) => Some(identity),
            Err(ResolveError::NotFound) => None,
            Err(ResolveError::Store(err)) => return Err(AuthError::Backend(err.to_string())),
        };

        let stored = identity.as_ref().map(|identity| identity.password_hash.clone());
        let matched = check_password(password, stored).await?;

        match identity {
            Some(identity) if matched => Ok(identity),
            _ => {
                debug!(username, "credential check failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
