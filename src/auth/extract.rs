//! Request extractors for authenticated callers.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use time::OffsetDateTime;
use tracing::debug;

use crate::http::{ApiError, AppState};
use crate::model::{Id, User};

/// A caller holding a valid token for a live session on a non-banned account.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub sid: String,
}

impl AuthUser {
    /// Players may only act on their own account; admins on any.
    pub fn ensure_can_access(&self, user_id: Id) -> Result<(), ApiError> {
        if self.user.id == user_id || self.user.is_admin {
            Ok(())
        } else {
            debug!(caller = self.user.id, target = user_id, "cross-account access denied");
            Err(ApiError::forbidden("Access denied"))
        }
    }

    /// The account a request body names, defaulting to the caller.
    pub fn target(&self, user_id: Option<Id>) -> Result<Id, ApiError> {
        let id = user_id.unwrap_or(self.user.id);
        self.ensure_can_access(id)?;
        Ok(id)
    }
}

fn bearer(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer(parts).ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
        let now = OffsetDateTime::now_utc();
        let claims = state.signer.verify(token, now.unix_timestamp()).map_err(|err| {
            debug!(error = %err, "token rejected");
            ApiError::unauthorized("Invalid or expired token")
        })?;
        let user_id = state
            .sessions
            .lookup(&claims.sid, now)
            .filter(|id| *id == claims.sub)
            .ok_or_else(|| ApiError::unauthorized("Session expired"))?;
        let user = state
            .store
            .user(user_id)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;
        if user.is_banned {
            return Err(ApiError::forbidden("Account banned"));
        }
        Ok(Self { user, sid: claims.sid })
    }
}

/// An authenticated caller with the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser { user, .. } = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ApiError::forbidden("Admin access required"));
        }
        Ok(Self(user))
    }
}
