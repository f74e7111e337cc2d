//! Traveler profile: preference fields read and partially updated.

use std::collections::BTreeSet;

use axum::{
    Extension, Json,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;

use crate::api::error::{ApiError, ErrorBody};

use super::principal::{Principal, require_auth};
use super::storage::{self, ProfileChanges, ProfileRecord};
use super::types::{ProfileResponse, ProfileUpdateRequest};

/// Ordinal budget tiers, cheapest first.
const BUDGET_TIERS: [&str; 5] = ["$", "$$", "$$$", "$$$$", "$$$$$"];

const TRAVEL_STYLES: [&str; 3] = ["relaxed", "balanced", "packed"];

/// Current profile of the authenticated account.
#[utoipa::path(
    get,
    path = "/auth/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 404, description = "Account not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn profile(headers: HeaderMap, pool: Extension<PgPool>) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &pool).await?;

    let Some(record) = storage::fetch_profile(&pool, principal.account_id).await? else {
        return Err(ApiError::NotFound("account not found"));
    };

    Ok((StatusCode::OK, Json(profile_response(&principal, record))).into_response())
}

/// Partial profile update. Enum fields with values outside their set are
/// dropped without comment, keeping the stored value; free-text fields are
/// taken verbatim. Responds with the profile as stored afterwards.
#[utoipa::path(
    post,
    path = "/auth/profile",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 404, description = "Account not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn update_profile(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    payload: Option<Json<ProfileUpdateRequest>>,
) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &pool).await?;

    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("missing payload"));
    };

    let changes = validated_changes(request);

    let Some(record) = storage::update_profile(&pool, principal.account_id, changes).await? else {
        return Err(ApiError::NotFound("account not found"));
    };

    Ok((StatusCode::OK, Json(profile_response(&principal, record))).into_response())
}

fn validated_changes(request: ProfileUpdateRequest) -> ProfileChanges {
    ProfileChanges {
        budget_preference: request
            .budget_preference
            .filter(|value| BUDGET_TIERS.contains(&value.as_str())),
        travel_style: request
            .travel_style
            .filter(|value| TRAVEL_STYLES.contains(&value.as_str())),
        interests: request.interests.as_deref().map(normalize_interests),
        bio: request.bio,
        must_see: request.must_see,
        must_avoid: request.must_avoid,
        notes: request.notes,
    }
}

/// Canonical JSON form of an interest list: trimmed, empties dropped,
/// de-duplicated, sorted.
fn normalize_interests(values: &[String]) -> String {
    let set: BTreeSet<&str> = values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect();

    serde_json::to_string(&set).unwrap_or_else(|_| "[]".to_string())
}

fn profile_response(principal: &Principal, record: ProfileRecord) -> ProfileResponse {
    // Stored interests text always holds a JSON array; anything else reads
    // back as empty rather than failing the request.
    let interests: Vec<String> = serde_json::from_str(&record.interests).unwrap_or_default();

    ProfileResponse {
        account_id: principal.account_id.to_string(),
        email: principal.email.clone(),
        verified: principal.verified,
        budget_preference: record.budget_preference,
        travel_style: record.travel_style,
        interests,
        bio: record.bio,
        must_see: record.must_see,
        must_avoid: record.must_avoid,
        notes: record.notes,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> Extension<PgPool> {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/postgres")
            .expect("Failed to create lazy connection");
        Extension(pool)
    }

    #[tokio::test]
    async fn profile_requires_session() {
        let result = profile(HeaderMap::new(), lazy_pool()).await;
        assert!(matches!(result, Err(ApiError::LoginRequired)));

        let result = update_profile(HeaderMap::new(), lazy_pool(), None).await;
        assert!(matches!(result, Err(ApiError::LoginRequired)));
    }

    #[test]
    fn invalid_enum_values_are_dropped() {
        let changes = validated_changes(ProfileUpdateRequest {
            budget_preference: Some("bad".to_string()),
            travel_style: Some("chill".to_string()),
            ..ProfileUpdateRequest::default()
        });

        assert_eq!(changes.budget_preference, None);
        assert_eq!(changes.travel_style, None);
    }

    #[test]
    fn valid_enum_values_pass_through() {
        let changes = validated_changes(ProfileUpdateRequest {
            budget_preference: Some("$$".to_string()),
            travel_style: Some("packed".to_string()),
            ..ProfileUpdateRequest::default()
        });

        assert_eq!(changes.budget_preference.as_deref(), Some("$$"));
        assert_eq!(changes.travel_style.as_deref(), Some("packed"));
    }

    #[test]
    fn free_text_fields_are_verbatim() {
        let changes = validated_changes(ProfileUpdateRequest {
            bio: Some("  loves trains  ".to_string()),
            notes: Some(String::new()),
            ..ProfileUpdateRequest::default()
        });

        assert_eq!(changes.bio.as_deref(), Some("  loves trains  "));
        assert_eq!(changes.notes.as_deref(), Some(""));
        assert_eq!(changes.must_see, None);
    }

    #[test]
    fn interests_are_deduplicated_and_sorted() {
        let values = vec![
            " hiking ".to_string(),
            "food".to_string(),
            "hiking".to_string(),
            "  ".to_string(),
        ];

        assert_eq!(normalize_interests(&values), r#"["food","hiking"]"#);
        assert_eq!(normalize_interests(&[]), "[]");
    }

    #[test]
    fn omitted_fields_change_nothing() {
        let changes = validated_changes(ProfileUpdateRequest::default());

        assert_eq!(changes.budget_preference, None);
        assert_eq!(changes.travel_style, None);
        assert_eq!(changes.interests, None);
        assert_eq!(changes.bio, None);
    }
}
