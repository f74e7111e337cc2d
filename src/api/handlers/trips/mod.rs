//! Saved trips: append-only itinerary records scoped to their owner.

mod storage;

pub mod types;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Extension, Json,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::state::AppState;

use super::auth::principal::require_auth;
use types::{SaveTripRequest, SaveTripResponse, TripRecord, TripSummary};

const TRIP_TITLE_PLACEHOLDER: &str = "my trip";

/// Persist an itinerary. The payload is stored as-is; only the title is
/// massaged (placeholder when blank, truncated when oversized).
#[utoipa::path(
    post,
    path = "/trips/save",
    request_body = SaveTripRequest,
    responses(
        (status = 201, description = "Trip saved", body = SaveTripResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "trips"
)]
pub async fn save_trip(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    state: Extension<Arc<AppState>>,
    payload: Option<Json<SaveTripRequest>>,
) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &pool).await?;

    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("missing payload"));
    };

    let title = normalize_title(
        request.title.as_deref(),
        state.config().trip_title_max_chars(),
    );
    let payload_text =
        serde_json::to_string(&request.payload).context("failed to serialize trip payload")?;

    let id = storage::insert_trip(&pool, principal.account_id, &title, &payload_text).await?;
    debug!("Saved trip {id}");

    Ok((StatusCode::CREATED, Json(SaveTripResponse { id })).into_response())
}

/// All trips of the caller, newest first.
#[utoipa::path(
    get,
    path = "/trips",
    responses(
        (status = 200, description = "Trips, newest first", body = [TripSummary]),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "trips"
)]
pub async fn list_trips(headers: HeaderMap, pool: Extension<PgPool>) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &pool).await?;

    let rows = storage::list_trips(&pool, principal.account_id).await?;
    let trips: Vec<TripSummary> = rows
        .into_iter()
        .map(|row| TripSummary {
            id: row.id,
            title: row.title,
            created_at: row.created_at,
        })
        .collect();

    Ok((StatusCode::OK, Json(trips)).into_response())
}

/// One trip by id. Ids that don't parse, don't exist, or belong to another
/// account all read as the same not-found.
#[utoipa::path(
    get,
    path = "/trips/{id}",
    params(
        ("id" = String, Path, description = "Trip id"),
    ),
    responses(
        (status = 200, description = "Trip", body = TripRecord),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 404, description = "Trip not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "trips"
)]
pub async fn get_trip(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &pool).await?;

    let Ok(trip_id) = Uuid::parse_str(id.trim()) else {
        return Err(ApiError::NotFound("trip not found"));
    };

    let Some(row) = storage::fetch_trip(&pool, principal.account_id, trip_id).await? else {
        return Err(ApiError::NotFound("trip not found"));
    };

    let payload: Value =
        serde_json::from_str(&row.payload).context("stored trip payload is not valid JSON")?;

    Ok((
        StatusCode::OK,
        Json(TripRecord {
            id: row.id,
            title: row.title,
            payload,
            created_at: row.created_at,
        }),
    )
        .into_response())
}

fn normalize_title(title: Option<&str>, max_chars: usize) -> String {
    let trimmed = title.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return TRIP_TITLE_PLACEHOLDER.to_string();
    }
    trimmed.chars().take(max_chars).collect()
}
