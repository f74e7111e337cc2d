//! Request and response shapes for trip records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SaveTripRequest {
    /// Display title; blank or missing becomes a placeholder.
    pub title: Option<String>,
    /// Opaque itinerary document, stored as-is.
    #[schema(value_type = Object)]
    pub payload: Value,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SaveTripResponse {
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TripSummary {
    pub id: String,
    pub title: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TripRecord {
    pub id: String,
    pub title: String,
    #[schema(value_type = Object)]
    pub payload: Value,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::SaveTripRequest;
    use serde_json::json;

    #[test]
    fn save_request_title_is_optional() {
        let request: SaveTripRequest =
            serde_json::from_value(json!({"payload": {"days": 3}})).unwrap();
        assert_eq!(request.title, None);
        assert_eq!(request.payload, json!({"days": 3}));
    }

    #[test]
    fn save_request_accepts_any_payload_shape() {
        let request: SaveTripRequest = serde_json::from_value(json!({
            "title": "lisbon",
            "payload": [1, "two", {"three": null}]
        }))
        .unwrap();
        assert_eq!(request.title.as_deref(), Some("lisbon"));
        assert!(request.payload.is_array());
    }
}
