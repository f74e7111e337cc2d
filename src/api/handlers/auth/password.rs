//! Password recovery: forgot-password mail and the signed reset link.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::api::error::{ApiError, ErrorBody};
use crate::api::state::AppState;
use crate::token::Intent;

use super::storage;
use super::types::{ForgotRequest, ForgotResponse, ResetRequest, ResetResponse};
use super::utils::{build_reset_url, hash_password, normalize_email};

/// Start a password reset. The response message is the same whether or not
/// the account exists, so this endpoint cannot be used to probe for emails.
#[utoipa::path(
    post,
    path = "/auth/forgot",
    request_body = ForgotRequest,
    responses(
        (status = 200, description = "Reset mail queued when the account exists", body = ForgotResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn forgot(
    pool: Extension<PgPool>,
    state: Extension<Arc<AppState>>,
    payload: Option<Json<ForgotRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("missing payload"));
    };

    let email = normalize_email(&request.email);

    let mut fallback = None;
    if storage::account_exists(&pool, &email).await? {
        let token = state.signer().issue(&email, Intent::Reset)?;
        let reset_url = build_reset_url(state.config().public_base_url(), &token);
        let body = format!("reset link: {reset_url}");

        if let Err(err) = state
            .mailer()
            .send(
                "reset your windrose password",
                std::slice::from_ref(&email),
                &body,
            )
            .await
        {
            warn!("Reset mail not sent: {err}");
            fallback = Some(reset_url);
        }
    }

    Ok((
        StatusCode::OK,
        Json(ForgotResponse {
            message: "if an account exists, a reset email was sent".to_string(),
            reset_url: fallback,
        }),
    )
        .into_response())
}

/// Check a reset link before showing the new-password form.
#[utoipa::path(
    get,
    path = "/auth/reset/{token}",
    params(
        ("token" = String, Path, description = "Signed reset token"),
    ),
    responses(
        (status = 200, description = "Link is valid", body = ResetResponse),
        (status = 400, description = "Invalid or expired link", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn reset_precheck(
    Path(token): Path<String>,
    state: Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    if state
        .signer()
        .verify(&token, Intent::Reset, Intent::Reset.max_age_seconds())
        .is_none()
    {
        return Err(ApiError::Token("reset link invalid or expired"));
    }

    Ok((
        StatusCode::OK,
        Json(ResetResponse {
            message: "reset link valid".to_string(),
        }),
    )
        .into_response())
}

/// Set a new password. The signed token proves control of the email channel;
/// the old password is not required. All live sessions of the account are
/// revoked in the same transaction.
#[utoipa::path(
    post,
    path = "/auth/reset/{token}",
    params(
        ("token" = String, Path, description = "Signed reset token"),
    ),
    request_body = ResetRequest,
    responses(
        (status = 200, description = "Password updated", body = ResetResponse),
        (status = 400, description = "Invalid link or payload", body = ErrorBody),
        (status = 404, description = "Account not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn reset(
    Path(token): Path<String>,
    pool: Extension<PgPool>,
    state: Extension<Arc<AppState>>,
    payload: Option<Json<ResetRequest>>,
) -> Result<Response, ApiError> {
    // Token validity is checked before anything else; an expired link fails
    // the same way no matter what the body contains.
    let Some(email) = state
        .signer()
        .verify(&token, Intent::Reset, Intent::Reset.max_age_seconds())
    else {
        return Err(ApiError::Token("reset link invalid or expired"));
    };

    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("missing payload"));
    };
    if request.password.is_empty() {
        return Err(ApiError::Validation("password required"));
    }

    let password_hash = hash_password(&request.password)?;
    if !storage::rotate_password(&pool, &email, &password_hash).await? {
        return Err(ApiError::NotFound("account not found"));
    }

    debug!("Password rotated, sessions revoked");
    Ok((
        StatusCode::OK,
        Json(ResetResponse {
            message: "password updated, you can now log in".to_string(),
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
    async fn forgot_requires_payload() {
        let result = forgot(lazy_pool(), test_state(), None).await;
        assert!(matches!(
            result,
            Err(ApiError::Validation("missing payload"))
        ));
    }

    #[tokio::test]
    async fn precheck_rejects_garbage_token() {
        let result = reset_precheck(Path("garbage".to_string()), test_state()).await;
        assert!(matches!(
            result,
            Err(ApiError::Token("reset link invalid or expired"))
        ));
    }

    #[tokio::test]
    async fn precheck_accepts_fresh_token() {
        let state = test_state();
        let token = state
            .signer()
            .issue("alice@example.com", Intent::Reset)
            .expect("Failed to issue token");

        let response = reset_precheck(Path(token), state)
            .await
            .expect("handler failed");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn reset_rejects_verify_token() {
        let state = test_state();
        let token = state
            .signer()
            .issue("alice@example.com", Intent::Verify)
            .expect("Failed to issue token");

        let result = reset(Path(token), lazy_pool(), state, None).await;
        assert!(matches!(
            result,
            Err(ApiError::Token("reset link invalid or expired"))
        ));
    }

    #[tokio::test]
    async fn reset_requires_payload() {
        let state = test_state();
        let token = state
            .signer()
            .issue("alice@example.com", Intent::Reset)
            .expect("Failed to issue token");

        let result = reset(Path(token), lazy_pool(), state, None).await;
        assert!(matches!(
            result,
            Err(ApiError::Validation("missing payload"))
        ));
    }

    #[tokio::test]
    async fn reset_rejects_empty_password() {
        let state = test_state();
        let token = state
            .signer()
            .issue("alice@example.com", Intent::Reset)
            .expect("Failed to issue token");

        let payload = Json(ResetRequest {
            password: String::new(),
        });
        let result = reset(Path(token), lazy_pool(), state, Some(payload)).await;
        assert!(matches!(
            result,
            Err(ApiError::Validation("password required"))
        ));
    }
}
