//! Questionnaire review echo and the itinerary generation relay.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::planner::build_prompt;
use crate::api::state::AppState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GenerateRequest {
    /// Questionnaire answers, forwarded verbatim into the prompt.
    #[schema(value_type = Object)]
    pub payload: Value,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Raw completion text, or a JSON error document when the completion
    /// failed.
    pub itinerary: String,
}

/// Echo questionnaire fields passed as query parameters, so the review page
/// can render exactly what would be submitted.
#[utoipa::path(
    get,
    path = "/review",
    responses(
        (status = 200, description = "Echoed fields", body = Object),
    ),
    tag = "planner"
)]
pub async fn review_query(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    (StatusCode::OK, Json(params))
}

/// Echo a submitted questionnaire document.
#[utoipa::path(
    post,
    path = "/review",
    request_body = Object,
    responses(
        (status = 200, description = "Echoed document", body = Object),
        (status = 400, description = "Invalid payload", body = ErrorBody),
    ),
    tag = "planner"
)]
pub async fn review_submit(payload: Option<Json<Value>>) -> Result<Response, ApiError> {
    let Some(Json(value)) = payload else {
        return Err(ApiError::Validation("missing payload"));
    };

    Ok((StatusCode::OK, Json(value)).into_response())
}

/// Run one completion over the questionnaire payload. A failed completion
/// still answers 200; the itinerary field carries a JSON error document
/// instead of plan text, and the client renders whatever it gets.
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated itinerary text", body = GenerateResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
    ),
    tag = "planner"
)]
pub async fn generate(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<GenerateRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("missing payload"));
    };

    let prompt = build_prompt(&request.payload);

    let itinerary = match state.planner().complete(&prompt).await {
        Ok(text) => text,
        Err(err) => {
            warn!("Itinerary completion failed: {err}");
            json!({"error": "itinerary service failed", "detail": err.to_string()}).to_string()
        }
    };

    Ok((StatusCode::OK, Json(GenerateResponse { itinerary })).into_response())
}
