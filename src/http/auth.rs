//! Registration, login and session endpoints.

use axum::extract::State;
use axum::Router;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{error, info};

use super::{ApiError, ApiJson, AppState, Message, get, post};
use crate::auth::token::Claims;
use crate::auth::{password, AuthUser};
use crate::model::{Id, Profile};

pub const MAX_USERNAME_CHARS: usize = 32;
pub const MIN_PASSWORD_CHARS: usize = 6;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct Registered {
    id: Id,
    username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoggedIn {
    #[serde(flatten)]
    profile: Profile,
    token: String,
    #[serde(with = "time::serde::rfc3339")]
    expires_at: OffsetDateTime,
}

fn valid_registration(username: &str, secret: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= MAX_USERNAME_CHARS
        && !username.chars().any(char::is_whitespace)
        && secret.chars().count() >= MIN_PASSWORD_CHARS
}

async fn register(
    State(state): State<AppState>,
    ApiJson(Credentials { username, password: secret }): ApiJson<Credentials>,
) -> Result<ApiJson<Registered>, ApiError> {
    let username = username.trim().to_owned();
    if !valid_registration(&username, &secret) {
        return Err(ApiError::bad_request("Invalid registration data"));
    }
    if state.store.user_by_username(&username).is_some() {
        return Err(ApiError::bad_request("Username already exists"));
    }

    let hash = tokio::task::spawn_blocking(move || password::hash(&secret)).await??;
    let user = state.store.create_user(&username, hash)?;
    Ok(ApiJson(Registered { id: user.id, username: user.username }))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(Credentials { username, password: secret }): ApiJson<Credentials>,
) -> Result<ApiJson<LoggedIn>, ApiError> {
    let invalid = || ApiError::unauthorized("Invalid credentials");
    let Some(user) = state.store.user_by_username(username.trim()) else {
        tokio::task::spawn_blocking(move || password::verify_absent(&secret)).await?;
        return Err(invalid());
    };

    let stored = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || password::verify(&secret, &stored)).await?;
    if !matches {
        return Err(invalid());
    }
    if user.is_banned {
        return Err(ApiError::forbidden("Account banned"));
    }

    let opened = state.sessions.open(user.id, OffsetDateTime::now_utc());
    let claims = Claims {
        sub: user.id,
        sid: opened.sid,
        iat: opened.issued_at.unix_timestamp(),
        exp: opened.expires_at.unix_timestamp(),
    };
    let token = state.signer.issue(&claims).map_err(|err| {
        error!(error = %err, "failed to issue token");
        ApiError::internal("Login failed")
    })?;
    info!(user_id = user.id, "logged in");
    Ok(ApiJson(LoggedIn { profile: user.profile(), token, expires_at: opened.expires_at }))
}

async fn logout(State(state): State<AppState>, auth: AuthUser) -> ApiJson<Message> {
    state.sessions.revoke(&auth.sid);
    info!(user_id = auth.user.id, "logged out");
    ApiJson(Message { message: "Logged out" })
}

async fn me(auth: AuthUser) -> ApiJson<Profile> {
    ApiJson(auth.user.profile())
}
