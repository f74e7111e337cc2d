//! Session introspection, logout, and the session cookie format.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Extension, Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use tracing::error;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::state::{AppConfig, AppState};

use super::storage::{self, SessionRecord};
use super::types::SessionResponse;
use super::utils::hash_session_token;

/// Cookie carrying the opaque session token.
pub const SESSION_COOKIE_NAME: &str = "windrose_session";

/// Report the account behind the request's session, 204 when there is none.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Active session", body = SessionResponse),
        (status = 204, description = "No active session"),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, pool: Extension<PgPool>) -> Result<Response, ApiError> {
    match authenticate_session(&headers, &pool).await? {
        Some(record) => Ok((
            StatusCode::OK,
            Json(SessionResponse {
                account_id: record.account_id.to_string(),
                email: record.email,
                verified: record.verified,
            }),
        )
            .into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Drop the session row and clear the cookie. Always succeeds; logging out
/// twice is not an error.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn logout(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    state: Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    if let Some(token) = extract_session_token(&headers) {
        let token_hash = hash_session_token(&token);
        // The cookie is cleared even when the row was already gone.
        if let Err(err) = storage::delete_session(&pool, &token_hash).await {
            error!("Failed to delete session: {err:?}");
        }
    }

    let cookie = clear_session_cookie(state.config())?;
    let mut response = StatusCode::NO_CONTENT.into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// Resolve the request's session token to a live session, if any.
pub(crate) async fn authenticate_session(
    headers: &HeaderMap,
    pool: &PgPool,
) -> Result<Option<SessionRecord>> {
    let Some(token) = extract_session_token(headers) else {
        return Ok(None);
    };
    let token_hash = hash_session_token(&token);
    storage::lookup_session(pool, &token_hash).await
}

/// Pull the session token from the cookie, or from a Bearer header for
/// non-browser clients.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookies) = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
    {
        for pair in cookies.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            if parts.next() == Some(SESSION_COOKIE_NAME) {
                if let Some(value) = parts.next() {
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub(super) fn session_cookie(token: &str, config: &AppConfig) -> Result<HeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        config.session_ttl_seconds()
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).context("failed to build session cookie")
}

pub(super) fn clear_session_cookie(config: &AppConfig) -> Result<HeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).context("failed to build session cookie")
}
