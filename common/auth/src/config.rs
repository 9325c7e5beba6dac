use chrono::Duration;

/// Default lifetime of an issued token. There is no refresh flow, so clients
/// re-authenticate once it lapses.
pub const DEFAULT_TTL_SECONDS: i64 = 120;

/// Upper bound on the token lifetime (one day).
pub const MAX_TTL_SECONDS: i64 = 86_400;

/// Runtime configuration for token issuance and verification.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Lifetime of issued tokens in seconds.
    pub ttl_seconds: i64,
    /// Allowable clock skew in seconds when checking `exp`.
    pub leeway_seconds: u32,
    /// Optional `iss` claim; enforced on verification when set.
    pub issuer: Option<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECONDS)
    }
}

impl TokenConfig {
    /// Construct config with no leeway and no issuer.
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds,
            leeway_seconds: 0,
            issuer: None,
        }
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_seconds)
    }
}
