//! Itinerary generation through Google's Gemini REST API.
//!
//! The service treats the model as an opaque text-completion function: one
//! prompt in, one text blob out. The prompt asks for JSON but nothing here
//! validates the shape of what comes back, the client renders it as-is.
//! A single request is made per completion, there is no retry.

use crate::APP_USER_AGENT;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const PROMPT_INSTRUCTIONS: &str = concat!(
    "Using the following trip data, generate 2 different day by day travel plans ",
    "and put the location plans in JSON. Output ONLY JSON. Each activity must ",
    "include an exact spot (e.g., 'Eiffel Tower', 'McDonald's'). Keep the schema like: ",
    r#"{"travel_plans":[{"plan_name":"","plan_description":"","daily_plan":[{"day":1,"#,
    r#""date":"YYYY-MM-DD","theme":"","activities":[{"time_of_day":"","spot":"","description":""}]}]}]}. "#,
    "Budget key: $ = shoestring, $$ = budget, $$$ = comfortable, $$$$ = splurge, $$$$$ = luxury.",
);

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("no itinerary service configured")]
    NotConfigured,

    #[error("invalid itinerary endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("itinerary service returned status {0}")]
    Status(u16),

    #[error("itinerary service returned no completion text")]
    EmptyCompletion,
}

/// Builds the completion prompt for a questionnaire payload. The payload is
/// embedded pretty-printed so the model sees field names in context.
#[must_use]
pub fn build_prompt(payload: &Value) -> String {
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());

    format!("{PROMPT_INSTRUCTIONS}\nTrip data:\n```json\n{pretty}\n```")
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn completion_text(response: CompletionResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let content = candidate.content?;

    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    let text = text.trim().to_string();
    if text.is_empty() {
        return None;
    }

    Some(text)
}

/// Completion backend. [`Planner::Disabled`] keeps the rest of the service
/// usable when no API key is configured.
pub enum Planner {
    Disabled,
    Gemini(GeminiClient),
}

impl Planner {
    /// Runs one completion for `prompt` and returns the raw text.
    pub async fn complete(&self, prompt: &str) -> Result<String, PlannerError> {
        match self {
            Self::Disabled => Err(PlannerError::NotConfigured),
            Self::Gemini(client) => client.complete(prompt).await,
        }
    }
}

pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(
        base_url: &Url,
        model: &str,
        api_key: SecretString,
        timeout_seconds: u64,
    ) -> Result<Self, PlannerError> {
        let endpoint = base_url.join(&format!("v1beta/models/{model}:generateContent"))?;

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String, PlannerError> {
        let request = CompletionRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::Status(status.as_u16()));
        }

        let body: CompletionResponse = response.json().await?;

        debug!(candidates = body.candidates.len(), "Completion received");

        completion_text(body).ok_or(PlannerError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CompletionResponse, DEFAULT_MODEL, GeminiClient, Planner, PlannerError, build_prompt,
        completion_text,
    };
    use secrecy::SecretString;
    use serde_json::json;
    use url::Url;

    #[test]
    fn prompt_embeds_instructions_and_payload() {
        let payload = json!({"destination": "Lisbon", "days": 3, "budget": "$$"});

        let prompt = build_prompt(&payload);

        assert!(prompt.contains("Output ONLY JSON"));
        assert!(prompt.contains(r#""travel_plans""#));
        assert!(prompt.contains("$$$$$ = luxury"));
        assert!(prompt.contains(r#""destination": "Lisbon""#));
        assert!(prompt.ends_with("```"));
    }

    #[test]
    fn prompt_pretty_prints_nested_payloads() {
        let payload = json!({"party": {"adults": 2, "kids": 1}});

        let prompt = build_prompt(&payload);

        // indent=2 style, one key per line
        assert!(prompt.contains("  \"party\": {"));
        assert!(prompt.contains("    \"adults\": 2"));
    }

    #[test]
    fn completion_text_joins_parts_and_trims() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "  {\"travel_plans\":"},
                        {"text": "[]}  "}
                    ]
                }
            }]
        }))
        .unwrap();

        assert_eq!(
            completion_text(response).unwrap(),
            "{\"travel_plans\":[]}"
        );
    }

    #[test]
    fn completion_text_rejects_empty_candidates() {
        let empty: CompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(completion_text(empty).is_none());

        let blank: CompletionResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "   "}]}}]
        }))
        .unwrap();
        assert!(completion_text(blank).is_none());
    }

    #[test]
    fn client_builds_generate_content_endpoint() {
        let base = Url::parse("https://generativelanguage.googleapis.com").unwrap();

        let client = GeminiClient::new(
            &base,
            DEFAULT_MODEL,
            SecretString::from("test-key"),
            30,
        )
        .unwrap();

        assert_eq!(
            client.endpoint.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn disabled_planner_reports_not_configured() {
        let planner = Planner::Disabled;

        let result = planner.complete("plan a trip").await;

        assert!(matches!(result, Err(PlannerError::NotConfigured)));
    }
}
