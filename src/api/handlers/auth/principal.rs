//! Caller identity resolved from the session cookie.

use axum::http::HeaderMap;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::error::ApiError;

use super::session::authenticate_session;

/// The authenticated account behind a request.
pub(crate) struct Principal {
    pub(crate) account_id: Uuid,
    pub(crate) email: String,
    pub(crate) verified: bool,
}

/// Resolve the session into a [`Principal`], or fail with the single
/// login-required error. Handlers gate protected routes with this.
pub(crate) async fn require_auth(
    headers: &HeaderMap,
    pool: &PgPool,
) -> Result<Principal, ApiError> {
    let record = authenticate_session(headers, pool)
        .await?
        .ok_or(ApiError::LoginRequired)?;

    Ok(Principal {
        account_id: record.account_id,
        email: record.email,
        verified: record.verified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn missing_session_requires_login() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/postgres")
            .expect("Failed to create lazy connection");

        let result = require_auth(&HeaderMap::new(), &pool).await;
        assert!(matches!(result, Err(ApiError::LoginRequired)));
    }
}
