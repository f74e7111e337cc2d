//! Database helpers for trip records. Rows are append-only; there is no
//! update or delete path.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

pub(super) struct TripSummaryRow {
    pub(super) id: String,
    pub(super) title: String,
    pub(super) created_at: String,
}

pub(super) struct TripDetailRow {
    pub(super) id: String,
    pub(super) title: String,
    /// JSON text; parsed at the handler boundary.
    pub(super) payload: String,
    pub(super) created_at: String,
}

pub(super) async fn insert_trip(
    pool: &PgPool,
    account_id: Uuid,
    title: &str,
    payload_text: &str,
) -> Result<String> {
    let query = r"
        INSERT INTO trips (account_id, title, payload)
        VALUES ($1, $2, $3::jsonb)
        RETURNING id::text AS id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(account_id)
        .bind(title)
        .bind(payload_text)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert trip")?;

    Ok(row.get("id"))
}

pub(super) async fn list_trips(pool: &PgPool, account_id: Uuid) -> Result<Vec<TripSummaryRow>> {
    let query = r#"
        SELECT
            id::text AS id,
            title,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM trips
        WHERE account_id = $1
        ORDER BY created_at DESC, id DESC
    "#;
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(account_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list trips")?;

    Ok(rows
        .into_iter()
        .map(|row| TripSummaryRow {
            id: row.get("id"),
            title: row.get("title"),
            created_at: row.get("created_at"),
        })
        .collect())
}

/// Fetch one trip, scoped to its owner. Another account's id misses the
/// WHERE clause and reads as absent.
pub(super) async fn fetch_trip(
    pool: &PgPool,
    account_id: Uuid,
    trip_id: Uuid,
) -> Result<Option<TripDetailRow>> {
    let query = r#"
        SELECT
            id::text AS id,
            title,
            payload::text AS payload,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM trips
        WHERE id = $1 AND account_id = $2
    "#;
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(trip_id)
        .bind(account_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch trip")?;

    Ok(row.map(|row| TripDetailRow {
        id: row.get("id"),
        title: row.get("title"),
        payload: row.get("payload"),
        created_at: row.get("created_at"),
    }))
}
