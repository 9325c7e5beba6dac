use std::fmt;

use jsonwebtoken::{DecodingKey, EncodingKey};
use rand_core::{OsRng, RngCore};
use tracing::info;

use crate::error::{AuthError, AuthResult};

/// HS256 secrets shorter than the digest size weaken the MAC.
pub const MIN_SECRET_BYTES: usize = 32;
const GENERATED_SECRET_BYTES: usize = 64;

/// Symmetric key material, held in the two forms `jsonwebtoken` needs.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Holds the single active signing key for the lifetime of the process.
///
/// Constructed once at start-up and shared behind an `Arc`. The key is never
/// persisted, so a restart invalidates every outstanding token.
#[derive(Debug)]
pub struct SigningKeyStore {
    active: SigningKey,
}

impl SigningKeyStore {
    /// Generate a fresh random key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut secret = [0u8; GENERATED_SECRET_BYTES];
        OsRng.fill_bytes(&mut secret);
        info!(bytes = GENERATED_SECRET_BYTES, "generated process signing key");
        Self {
            active: SigningKey::from_secret(&secret),
        }
    }

    /// Build a store around a caller-supplied secret (fixed keys in tests).
    pub fn from_secret(secret: &[u8]) -> AuthResult<Self> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(AuthError::KeyMaterial(format!(
                "secret is {} bytes, need at least {MIN_SECRET_BYTES}",
                secret.len()
            )));
        }
        Ok(Self {
            active: SigningKey::from_secret(secret),
        })
    }

    pub fn current_key(&self) -> &SigningKey {
        &self.active
    }
}
