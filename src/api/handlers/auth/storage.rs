//! Database helpers for accounts, sessions, and profile preferences.

use anyhow::{Context, Result, anyhow};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::Instrument;
use uuid::Uuid;

use super::utils::{generate_session_token, hash_session_token, is_unique_violation};

/// Outcome when attempting to create a new account.
#[derive(Debug)]
pub(super) enum SignupOutcome {
    Created { account_id: Uuid },
    Conflict,
}

/// Outcome of applying a verification link to an account.
#[derive(Debug)]
pub(super) enum VerifyOutcome {
    Verified,
    AlreadyVerified,
    UnknownAccount,
}

/// Fields needed to check a login attempt.
pub(super) struct CredentialRecord {
    pub(super) account_id: Uuid,
    pub(super) password_hash: String,
    pub(super) verified: bool,
}

/// Minimal data returned for a valid session cookie.
pub(crate) struct SessionRecord {
    pub(crate) account_id: Uuid,
    pub(crate) email: String,
    pub(crate) verified: bool,
}

/// Preference columns of an account, timestamps already formatted. Identity
/// fields come from the authenticated session instead.
pub(super) struct ProfileRecord {
    pub(super) budget_preference: String,
    pub(super) travel_style: String,
    /// JSON array text; parsed at the handler boundary.
    pub(super) interests: String,
    pub(super) bio: Option<String>,
    pub(super) must_see: Option<String>,
    pub(super) must_avoid: Option<String>,
    pub(super) notes: Option<String>,
    pub(super) created_at: String,
    pub(super) updated_at: String,
}

/// Validated profile changes; `None` keeps the stored value.
#[derive(Debug, Default)]
pub(super) struct ProfileChanges {
    pub(super) budget_preference: Option<String>,
    pub(super) travel_style: Option<String>,
    /// Canonical JSON array text, already de-duplicated.
    pub(super) interests: Option<String>,
    pub(super) bio: Option<String>,
    pub(super) must_see: Option<String>,
    pub(super) must_avoid: Option<String>,
    pub(super) notes: Option<String>,
}

pub(super) async fn insert_account(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<SignupOutcome> {
    // Duplicate detection rides on the unique email index; concurrent
    // signups for the same address resolve to exactly one Created.
    let query = r"
        INSERT INTO accounts (email, password_hash)
        VALUES ($1, $2)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created {
            account_id: row.get("id"),
        }),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert account"),
    }
}

pub(super) async fn lookup_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CredentialRecord>> {
    let query = "SELECT id, password_hash, verified FROM accounts WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup credentials")?;

    Ok(row.map(|row| CredentialRecord {
        account_id: row.get("id"),
        password_hash: row.get("password_hash"),
        verified: row.get("verified"),
    }))
}

pub(super) async fn account_exists(pool: &PgPool, email: &str) -> Result<bool> {
    let query = "SELECT 1 FROM accounts WHERE email = $1 LIMIT 1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to check account existence")?;
    Ok(row.is_some())
}

/// Flip `verified` on, exactly once. The flag is monotonic; repeat links are
/// a no-op rather than an error.
pub(super) async fn apply_verification(pool: &PgPool, email: &str) -> Result<VerifyOutcome> {
    let query = r"
        UPDATE accounts
        SET verified = TRUE, updated_at = NOW()
        WHERE email = $1 AND verified = FALSE
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(email)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to mark account verified")?;

    if result.rows_affected() > 0 {
        return Ok(VerifyOutcome::Verified);
    }

    // No row changed: either the flag was already set or the account is gone.
    if account_exists(pool, email).await? {
        Ok(VerifyOutcome::AlreadyVerified)
    } else {
        Ok(VerifyOutcome::UnknownAccount)
    }
}

/// Overwrite the password hash and revoke every live session for the account.
/// Returns `false` when no account matches the email.
pub(super) async fn rotate_password(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<bool> {
    let mut tx = pool.begin().await.context("begin password reset transaction")?;

    let query = r"
        UPDATE accounts
        SET password_hash = $2, updated_at = NOW()
        WHERE email = $1
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&mut *tx)
        .instrument(span)
        .await
        .context("failed to update password hash")?;

    let Some(row) = row else {
        let _ = tx.rollback().await;
        return Ok(false);
    };

    let account_id: Uuid = row.get("id");
    let query = "DELETE FROM sessions WHERE account_id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(account_id)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to revoke sessions after reset")?;

    tx.commit().await.context("commit password reset transaction")?;
    Ok(true)
}

/// Drop rows past their deadline. Runs opportunistically on every session
/// insert; lookups already filter on `expires_at`, this keeps the table from
/// growing without bound.
async fn reap_expired_sessions(pool: &PgPool) -> Result<()> {
    let query = "DELETE FROM sessions WHERE expires_at <= NOW()";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to reap expired sessions")?;
    Ok(())
}

pub(super) async fn insert_session(
    pool: &PgPool,
    account_id: Uuid,
    ttl_seconds: i64,
) -> Result<String> {
    reap_expired_sessions(pool).await?;

    // Generate a random token, store only its hash, and return the raw value
    // so the caller can set the session cookie.
    let query = r"
        INSERT INTO sessions (account_id, session_hash, expires_at)
        VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );

    for _ in 0..3 {
        let token = generate_session_token()?;
        let token_hash = hash_session_token(&token);
        let result = sqlx::query(query)
            .bind(account_id)
            .bind(token_hash)
            .bind(ttl_seconds)
            .execute(pool)
            .instrument(span.clone())
            .await;

        match result {
            Ok(_) => return Ok(token),
            Err(err) if is_unique_violation(&err) => {}
            Err(err) => return Err(err).context("failed to insert session"),
        }
    }

    Err(anyhow!("failed to generate unique session token"))
}

pub(crate) async fn lookup_session(
    pool: &PgPool,
    token_hash: &[u8],
) -> Result<Option<SessionRecord>> {
    let query = r"
        SELECT accounts.id, accounts.email, accounts.verified
        FROM sessions
        JOIN accounts ON accounts.id = sessions.account_id
        WHERE sessions.session_hash = $1
          AND sessions.expires_at > NOW()
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup session")?;

    Ok(row.map(|row| SessionRecord {
        account_id: row.get("id"),
        email: row.get("email"),
        verified: row.get("verified"),
    }))
}

pub(super) async fn delete_session(pool: &PgPool, token_hash: &[u8]) -> Result<()> {
    // Logout is idempotent; it's fine if no rows are deleted.
    let query = "DELETE FROM sessions WHERE session_hash = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete session")?;
    Ok(())
}

const PROFILE_COLUMNS: &str = r#"
    budget_preference,
    travel_style,
    interests::text AS interests,
    bio,
    must_see,
    must_avoid,
    notes,
    to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
    to_char(updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
"#;

fn profile_from_row(row: &PgRow) -> ProfileRecord {
    ProfileRecord {
        budget_preference: row.get("budget_preference"),
        travel_style: row.get("travel_style"),
        interests: row.get("interests"),
        bio: row.get("bio"),
        must_see: row.get("must_see"),
        must_avoid: row.get("must_avoid"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub(super) async fn fetch_profile(
    pool: &PgPool,
    account_id: Uuid,
) -> Result<Option<ProfileRecord>> {
    let query = format!(
        r"
        SELECT {PROFILE_COLUMNS}
        FROM accounts
        WHERE id = $1
        LIMIT 1
    "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(account_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch profile")?;

    Ok(row.as_ref().map(profile_from_row))
}

/// Apply a partial profile update. `COALESCE` keeps stored values for every
/// field the request left out or that validation dropped.
pub(super) async fn update_profile(
    pool: &PgPool,
    account_id: Uuid,
    changes: ProfileChanges,
) -> Result<Option<ProfileRecord>> {
    let query = format!(
        r"
        UPDATE accounts
        SET
            budget_preference = COALESCE($1, budget_preference),
            travel_style = COALESCE($2, travel_style),
            interests = COALESCE($3::jsonb, interests),
            bio = COALESCE($4, bio),
            must_see = COALESCE($5, must_see),
            must_avoid = COALESCE($6, must_avoid),
            notes = COALESCE($7, notes),
            updated_at = NOW()
        WHERE id = $8
        RETURNING {PROFILE_COLUMNS}
    "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(changes.budget_preference)
        .bind(changes.travel_style)
        .bind(changes.interests)
        .bind(changes.bio)
        .bind(changes.must_see)
        .bind(changes.must_avoid)
        .bind(changes.notes)
        .bind(account_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update profile")?;

    Ok(row.as_ref().map(profile_from_row))
}

#[cfg(test)]
mod tests {
    use super::{ProfileChanges, SignupOutcome, VerifyOutcome};
    use uuid::Uuid;

    #[test]
    fn signup_outcome_debug_names() {
        let created = SignupOutcome::Created {
            account_id: Uuid::nil(),
        };
        assert!(format!("{created:?}").starts_with("Created"));
        assert_eq!(format!("{:?}", SignupOutcome::Conflict), "Conflict");
    }

    #[test]
    fn verify_outcome_debug_names() {
        assert_eq!(format!("{:?}", VerifyOutcome::Verified), "Verified");
        assert_eq!(
            format!("{:?}", VerifyOutcome::AlreadyVerified),
            "AlreadyVerified"
        );
        assert_eq!(
            format!("{:?}", VerifyOutcome::UnknownAccount),
            "UnknownAccount"
        );
    }

    #[test]
    fn profile_changes_default_keeps_everything() {
        let changes = ProfileChanges::default();
        assert!(changes.budget_preference.is_none());
        assert!(changes.travel_style.is_none());
        assert!(changes.interests.is_none());
        assert!(changes.bio.is_none());
        assert!(changes.must_see.is_none());
        assert!(changes.must_avoid.is_none());
        assert!(changes.notes.is_none());
    }
}
