//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub message: String,
    /// Set when the verification email could not be delivered so local and
    /// staging flows stay unblocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_url: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub account_id: String,
    pub email: String,
    pub verified: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ForgotRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ForgotResponse {
    pub message: String,
    /// Same delivery fallback as signup; only ever set when the account
    /// exists and the reset email could not be sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_url: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResetRequest {
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResetResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProfileResponse {
    pub account_id: String,
    pub email: String,
    pub verified: bool,
    pub budget_preference: String,
    pub travel_style: String,
    pub interests: Vec<String>,
    pub bio: Option<String>,
    pub must_see: Option<String>,
    pub must_avoid: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial profile update; absent fields keep their stored value.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct ProfileUpdateRequest {
    pub budget_preference: Option<String>,
    pub travel_style: Option<String>,
    pub interests: Option<Vec<String>>,
    pub bio: Option<String>,
    pub must_see: Option<String>,
    pub must_avoid: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn signup_request_round_trips() -> Result<()> {
        let request = SignupRequest {
            email: "alice@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let email = value
            .get("email")
            .and_then(serde_json::Value::as_str)
            .context("missing email")?;
        assert_eq!(email, "alice@example.com");
        let decoded: SignupRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.password, "hunter2");
        Ok(())
    }

    #[test]
    fn signup_response_hides_absent_verify_url() -> Result<()> {
        let response = SignupResponse {
            message: "check your email to verify your account".to_string(),
            verify_url: None,
        };
        let value = serde_json::to_value(&response)?;
        assert!(value.get("verify_url").is_none());

        let response = SignupResponse {
            message: "check your email to verify your account".to_string(),
            verify_url: Some("https://windrose.dev/auth/verify/tok".to_string()),
        };
        let value = serde_json::to_value(&response)?;
        assert_eq!(
            value.get("verify_url").and_then(serde_json::Value::as_str),
            Some("https://windrose.dev/auth/verify/tok")
        );
        Ok(())
    }

    #[test]
    fn profile_update_allows_sparse_payloads() -> Result<()> {
        let decoded: ProfileUpdateRequest = serde_json::from_str(r#"{"budget_preference":"$$$"}"#)?;
        assert_eq!(decoded.budget_preference.as_deref(), Some("$$$"));
        assert!(decoded.travel_style.is_none());
        assert!(decoded.interests.is_none());
        Ok(())
    }
}
