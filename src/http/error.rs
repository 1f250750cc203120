//! JSON error responses and extractors that produce them.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

use crate::auth::password::PasswordError;
use crate::games::GameError;
use crate::store::StoreError;

/// An error rendered as `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

#[derive(Serialize)]
struct Body<'a> {
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "request failed");
        } else {
            debug!(status = %self.status, message = %self.message, "request rejected");
        }
        (self.status, Json(Body { message: &self.message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::UserNotFound | StoreError::DepositNotFound | StoreError::WithdrawalNotFound => {
                StatusCode::NOT_FOUND
            }
            StoreError::Banned | StoreError::AdminCannotPlay | StoreError::AdminProtected => StatusCode::FORBIDDEN,
            StoreError::AlreadyDecided => StatusCode::CONFLICT,
            StoreError::UsernameTaken
            | StoreError::InsufficientBalance
            | StoreError::InsufficientCoins
            | StoreError::InsufficientBbc
            | StoreError::NonPositiveAmount
            | StoreError::Invalid(_)
            | StoreError::Overflow => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        error!(error = %err, "password hashing failed");
        Self::internal("Internal server error")
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!(error = %err, "blocking task failed");
        Self::internal("Internal server error")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(format!("Invalid path: {}", rejection.body_text()))
    }
}

/// `axum::Json` with JSON error bodies.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

/// `axum::extract::Path` with JSON error bodies.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::UserNotFound, StatusCode::NOT_FOUND),
            (StoreError::Banned, StatusCode::FORBIDDEN),
            (StoreError::AdminCannotPlay, StatusCode::FORBIDDEN),
            (StoreError::AlreadyDecided, StatusCode::CONFLICT),
            (StoreError::InsufficientCoins, StatusCode::BAD_REQUEST),
            (StoreError::UsernameTaken, StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
        assert_eq!(ApiError::from(StoreError::InsufficientBbc).message, "Insufficient BBC tokens");
    }

    #[test]
    fn game_errors_are_bad_requests() {
        let err = ApiError::from(GameError::BetSize);
        assert_eq!(err, ApiError::bad_request("Invalid bet amount"));
    }
}
