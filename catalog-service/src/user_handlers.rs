use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common_auth::{authorities, AuthError, Role};
use common_http_errors::ApiError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::credentials::hash_password;
use crate::identity::ResolveError;
use crate::models::{Identity, NewIdentity};
use crate::store::StoreError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Bare role name; `SELLER` when omitted.
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub token: String,
    pub roles: Vec<String>,
}

impl AppState {
    fn token_response(&self, identity: &Identity) -> Result<UserResponse, AuthError> {
        let roles = [identity.role];
        let token = self.codec.issue(&identity.username, &roles)?;
        Ok(UserResponse {
            id: identity.id,
            username: identity.username.clone(),
            token,
            roles: authorities(&roles),
        })
    }
}

fn parse_role(raw: Option<&str>) -> Result<Role, ApiError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(Role::default()),
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|err| ApiError::bad_request("invalid_role", err.to_string())),
    }
}

/// Usernames are stored and looked up without surrounding whitespace.
fn normalize_username(raw: &str) -> &str {
    raw.trim()
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let username = normalize_username(&req.username);
    if username.is_empty() {
        state.metrics.registration("invalid");
        return Err(ApiError::bad_request("invalid_username", "Username must not be empty"));
    }
    if req.password.is_empty() {
        state.metrics.registration("invalid");
        return Err(ApiError::bad_request("invalid_password", "Password must not be empty"));
    }
    let role = parse_role(req.role.as_deref()).inspect_err(|_| state.metrics.registration("invalid"))?;

    let password_hash = hash_password(&req.password).await?;
    let saved = state
        .users
        .save(NewIdentity {
            username: username.to_string(),
            password_hash,
            role,
        })
        .await;

    match saved {
        Ok(_) => {}
        Err(StoreError::Duplicate(_)) => {
            state.metrics.registration("duplicate");
            return Err(ApiError::conflict(
                "username_taken",
                format!("Username '{username}' is already taken"),
            ));
        }
        Err(err) => {
            state.metrics.registration("error");
            return Err(ApiError::internal(err));
        }
    }

    // Re-read the stored record so the first token reflects what was persisted.
    let identity = state.resolver.resolve(username).await.map_err(|err| match err {
        ResolveError::NotFound => ApiError::internal("registered identity vanished before token issue"),
        ResolveError::Store(err) => ApiError::internal(err),
    })?;

    let response = state.token_response(&identity)?;
    state.metrics.registration("success");
    info!(user_id = identity.id, username = %identity.username, role = identity.role.name(), "user registered");
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let username = normalize_username(&req.username);
    let identity = match state.credentials.verify(username, &req.password).await {
        Ok(identity) => identity,
        Err(err @ AuthError::InvalidCredentials) => {
            state.metrics.login_attempt("invalid_credentials");
            warn!(username = %username, "login rejected");
            return Err(err.into());
        }
        Err(err) => {
            state.metrics.login_attempt("error");
            return Err(err.into());
        }
    };

    let response = state.token_response(&identity)?;
    state.metrics.login_attempt("success");
    Ok(Json(response))
}
