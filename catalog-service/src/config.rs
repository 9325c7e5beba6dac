use anyhow::{anyhow, Context, Result};
use common_auth::{TokenConfig, DEFAULT_TTL_SECONDS, MAX_TTL_SECONDS};
use std::env;

const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:5173",
];

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// In-memory stores when unset.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub token: TokenConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            database_url: None,
            db_max_connections: 5,
            token: TokenConfig::default(),
            cors_allowed_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

pub fn load_service_config() -> Result<ServiceConfig> {
    let defaults = ServiceConfig::default();

    let host = env::var("HOST")
        .ok()
        .and_then(|value| normalize_optional(&value))
        .unwrap_or(defaults.host);
    let port = parsed_from_env("PORT")?.unwrap_or(defaults.port);

    let database_url = env::var("DATABASE_URL")
        .ok()
        .and_then(|value| normalize_optional(&value));
    let db_max_connections =
        parsed_from_env("DB_MAX_CONNECTIONS")?.unwrap_or(defaults.db_max_connections);

    let ttl_seconds =
        validate_ttl(parsed_from_env("AUTH_TOKEN_TTL_SECONDS")?.unwrap_or(DEFAULT_TTL_SECONDS))?;
    let leeway_seconds: u32 = parsed_from_env("AUTH_TOKEN_LEEWAY_SECONDS")?.unwrap_or(0);
    let mut token = TokenConfig::new(ttl_seconds).with_leeway(leeway_seconds);
    if let Some(issuer) = env::var("AUTH_TOKEN_ISSUER")
        .ok()
        .and_then(|value| normalize_optional(&value))
    {
        token = token.with_issuer(issuer);
    }

    let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|value| parse_list(&value))
        .filter(|origins| !origins.is_empty())
        .unwrap_or(defaults.cors_allowed_origins);

    Ok(ServiceConfig {
        host,
        port,
        database_url,
        db_max_connections,
        token,
        cors_allowed_origins,
    })
}

fn parsed_from_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env::var(key)
        .ok()
        .and_then(|value| normalize_optional(&value))
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|err| anyhow!("{err}"))
                .with_context(|| format!("Failed to parse {key}='{value}'"))
        })
        .transpose()
}

fn validate_ttl(ttl_seconds: i64) -> Result<i64> {
    if !(1..=MAX_TTL_SECONDS).contains(&ttl_seconds) {
        return Err(anyhow!(
            "AUTH_TOKEN_TTL_SECONDS must be between 1 and {MAX_TTL_SECONDS}, got {ttl_seconds}"
        ));
    }
    Ok(ttl_seconds)
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(|c| c == ',' || c == ';' || c == ' ')
        .filter_map(normalize_optional)
        .collect()
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
