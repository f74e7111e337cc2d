//! Schema bootstrap run once at startup.
//!
//! Every statement is idempotent so restarting against an already
//! provisioned database is a no-op.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::Instrument;

const STATEMENTS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS accounts (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        verified BOOLEAN NOT NULL DEFAULT FALSE,
        budget_preference TEXT NOT NULL DEFAULT '$$',
        travel_style TEXT NOT NULL DEFAULT 'balanced',
        interests JSONB NOT NULL DEFAULT '[]'::jsonb,
        bio TEXT,
        must_see TEXT,
        must_avoid TEXT,
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS sessions (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        session_hash BYTEA NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        expires_at TIMESTAMPTZ NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS sessions_expires_at_idx ON sessions (expires_at)",
    r"
    CREATE TABLE IF NOT EXISTS trips (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        payload JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    ",
    "CREATE INDEX IF NOT EXISTS trips_account_created_idx ON trips (account_id, created_at DESC)",
];

/// Create the tables and indexes the service expects.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in STATEMENTS {
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DDL",
            db.statement = *statement
        );
        sqlx::query(statement)
            .execute(pool)
            .instrument(span)
            .await
            .context("failed to apply schema statement")?;
    }
    Ok(())
}
