//! Account signup: create credentials and send a verification link.

use std::sync::Arc;

use axum::{
    Extension, Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::api::error::{ApiError, ErrorBody};
use crate::api::state::AppState;
use crate::token::Intent;

use super::storage::{self, SignupOutcome};
use super::types::{SignupRequest, SignupResponse};
use super::utils::{build_verify_url, hash_password, normalize_email, valid_email};

/// Create an account and queue the verification email.
///
/// When mail delivery is unavailable the verification link comes back in the
/// response body instead, so the flow still completes without a provider.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 409, description = "Account already exists", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn signup(
    pool: Extension<PgPool>,
    state: Extension<Arc<AppState>>,
    payload: Option<Json<SignupRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("missing payload"));
    };

    let email = normalize_email(&request.email);
    if email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation("email and password required"));
    }
    if !valid_email(&email) {
        return Err(ApiError::Validation("valid email required"));
    }

    let password_hash = hash_password(&request.password)?;

    let account_id = match storage::insert_account(&pool, &email, &password_hash).await? {
        SignupOutcome::Conflict => return Err(ApiError::DuplicateAccount),
        SignupOutcome::Created { account_id } => account_id,
    };
    debug!("Created account {account_id}");

    let token = state.signer().issue(&email, Intent::Verify)?;
    let verify_url = build_verify_url(state.config().public_base_url(), &token);
    let body = format!("click to verify: {verify_url}");

    let fallback = match state
        .mailer()
        .send(
            "verify your windrose account",
            std::slice::from_ref(&email),
            &body,
        )
        .await
    {
        Ok(()) => None,
        Err(err) => {
            warn!("Verification mail not sent: {err}");
            Some(verify_url)
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "check your email to verify your account".to_string(),
            verify_url: fallback,
        }),
    )
        .into_response())
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
    async fn signup_requires_payload() {
        let result = signup(lazy_pool(), test_state(), None).await;
        assert!(matches!(
            result,
            Err(ApiError::Validation("missing payload"))
        ));
    }

    #[tokio::test]
    async fn signup_requires_email_and_password() {
        let payload = Json(SignupRequest {
            email: "   ".to_string(),
            password: "hunter2".to_string(),
        });
        let result = signup(lazy_pool(), test_state(), Some(payload)).await;
        assert!(matches!(
            result,
            Err(ApiError::Validation("email and password required"))
        ));

        let payload = Json(SignupRequest {
            email: "alice@example.com".to_string(),
            password: String::new(),
        });
        let result = signup(lazy_pool(), test_state(), Some(payload)).await;
        assert!(matches!(
            result,
            Err(ApiError::Validation("email and password required"))
        ));
    }

    #[tokio::test]
    async fn signup_rejects_invalid_email() {
        let payload = Json(SignupRequest {
            email: "not-an-email".to_string(),
            password: "hunter2".to_string(),
        });
        let result = signup(lazy_pool(), test_state(), Some(payload)).await;
        assert!(matches!(
            result,
            Err(ApiError::Validation("valid email required"))
        ));
    }
}
