//! Login: check credentials and mint a session cookie.

use std::sync::Arc;

use axum::{
    Extension, Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use tracing::debug;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::state::AppState;

use super::session::session_cookie;
use super::storage;
use super::types::{LoginRequest, SessionResponse};
use super::utils::{normalize_email, verify_password};

/// Exchange credentials for a session cookie.
///
/// Every failure is the same 401 so callers cannot probe which emails have
/// accounts. Unverified accounts may still log in.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = SessionResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    state: Extension<Arc<AppState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("missing payload"));
    };

    let email = normalize_email(&request.email);

    let Some(credentials) = storage::lookup_credentials(&pool, &email).await? else {
        return Err(ApiError::InvalidCredentials);
    };
    if !verify_password(&request.password, &credentials.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let ttl = state.config().session_ttl_seconds();
    let token = storage::insert_session(&pool, credentials.account_id, ttl).await?;
    let cookie = session_cookie(&token, state.config())?;

    debug!("Session created for account {}", credentials.account_id);

    let mut response = (
        StatusCode::OK,
        Json(SessionResponse {
            account_id: credentials.account_id.to_string(),
            email,
            verified: credentials.verified,
        }),
    )
        .into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mail::Mailer;
    use crate::api::planner::Planner;
    use crate::api::state::AppConfig;
    use crate::token::TokenSigner;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;

    fn test_state() -> Extension<Arc<AppState>> {
        let config = AppConfig::new("http://localhost:8080".to_string());
        let signer = TokenSigner::new(&SecretString::from("test-secret"));
        Extension(Arc::new(AppState::new(
            config,
            signer,
            Mailer::Disabled,
            Planner::Disabled,
        )))
    }

    fn lazy_pool() -> Extension<PgPool> {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/postgres")
            .expect("Failed to create lazy connection");
        Extension(pool)
    }

    #[tokio::test]
    async fn login_requires_payload() {
        let result = login(lazy_pool(), test_state(), None).await;
        assert!(matches!(
            result,
            Err(ApiError::Validation("missing payload"))
        ));
    }
}
