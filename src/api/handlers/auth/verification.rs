//! Email verification via the signed link from the signup mail.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use tracing::debug;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::state::AppState;
use crate::token::Intent;

use super::storage::{self, VerifyOutcome};
use super::types::VerifyResponse;

/// Confirm an email address. Re-visiting an already used link succeeds, so
/// double-clicking in a mail client never shows an error.
#[utoipa::path(
    get,
    path = "/auth/verify/{token}",
    params(
        ("token" = String, Path, description = "Signed verification token"),
    ),
    responses(
        (status = 200, description = "Email verified", body = VerifyResponse),
        (status = 400, description = "Invalid or expired link", body = ErrorBody),
        (status = 404, description = "Account not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn verify_email(
    Path(token): Path<String>,
    pool: Extension<PgPool>,
    state: Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Some(email) = state
        .signer()
        .verify(&token, Intent::Verify, Intent::Verify.max_age_seconds())
    else {
        return Err(ApiError::Token("verification link invalid or expired"));
    };

    let outcome = storage::apply_verification(&pool, &email).await?;
    debug!("Verification outcome: {outcome:?}");

    match outcome {
        VerifyOutcome::Verified | VerifyOutcome::AlreadyVerified => Ok((
            StatusCode::OK,
            Json(VerifyResponse {
                message: "email verified, you can now log in".to_string(),
            }),
        )
            .into_response()),
        VerifyOutcome::UnknownAccount => Err(ApiError::NotFound("account not found")),
    }
}
