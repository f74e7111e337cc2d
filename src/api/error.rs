//! Error taxonomy shared by every handler.
//!
//! Credential and token failures are deliberately undifferentiated so
//! callers cannot enumerate accounts, and internal causes are logged
//! server-side but never leak into a response body.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// JSON body returned for every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input; user-correctable.
    #[error("{0}")]
    Validation(&'static str),
    /// Unique-email invariant would be violated.
    #[error("account already exists")]
    DuplicateAccount,
    /// Unknown account and wrong password produce the same error.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Session cookie missing, expired, or unknown.
    #[error("login required")]
    LoginRequired,
    /// Bad signature, wrong intent, and expiry all collapse here.
    #[error("{0}")]
    Token(&'static str),
    /// Unknown subject, or a record scoped to someone else.
    #[error("{0}")]
    NotFound(&'static str),
    /// Anything unexpected; details stay in the log.
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Token(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateAccount => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::LoginRequired => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let Self::Internal(err) = &self {
            error!("Internal error: {err:?}");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
