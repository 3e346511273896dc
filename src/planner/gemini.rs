//! Client for the Gemini `generateContent` endpoint

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error, info, instrument, warn};

use super::{ItineraryGenerator, build_prompt};
use crate::config::AiConfig;
use crate::models::{AITripPlan, TripRequest};
use crate::{Result, WanderlustError};

const MISSING_KEY_MESSAGE: &str = "API Key for Gemini is not configured.";

/// Itinerary generator backed by the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Response shape the model is asked to follow
#[must_use]
pub fn trip_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "destination": { "type": "STRING" },
            "duration": { "type": "INTEGER" },
            "itinerary": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "INTEGER" },
                        "title": { "type": "STRING" },
                        "activities": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        }
                    }
                }
            }
        }
    })
}

impl GeminiClient {
    /// Create a client from configuration. A missing credential is not an
    /// error here; it surfaces when an itinerary is requested.
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!(
                "No Gemini API key found in config or ${}; trip planning is disabled",
                config.api_key_env
            );
        }

        let http_client = Self::build_http_client(config.timeout())?;
        Ok(Self {
            http_client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Self::build_http_client(timeout)?;
        Ok(self)
    }

    fn build_http_client(timeout: Duration) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .user_agent(concat!("Wanderlust/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WanderlustError::config(format!("Failed to create HTTP client: {e}")))
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Request an itinerary. Fails with a configuration error before any
    /// network activity when no credential is set; every other failure is a
    /// generation error. Nothing is retried.
    #[instrument(skip(self), fields(model = %self.model))]
    pub async fn generate_trip_plan(&self, request: &TripRequest) -> Result<AITripPlan> {
        let Some(api_key) = self.api_key.as_deref() else {
            error!("Trip plan requested without a Gemini API key");
            return Err(WanderlustError::config(MISSING_KEY_MESSAGE));
        };

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(request)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: trip_plan_schema(),
            },
        };

        let start_time = Instant::now();
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Error generating trip plan with Gemini: {}", e);
                WanderlustError::generation(format!("request failed: {e}"))
            })?;

        let status = response.status();
        debug!(
            status = %status,
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Gemini responded"
        );
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(status = %status, "Gemini request failed: {}", detail);
            return Err(WanderlustError::generation(format!(
                "completion endpoint answered {status}"
            )));
        }

        let envelope: GenerateContentResponse = response.json().await.map_err(|e| {
            error!("Unreadable Gemini response: {}", e);
            WanderlustError::generation(format!("unreadable response: {e}"))
        })?;

        let text = envelope.text().ok_or_else(|| {
            error!("Gemini response carried no text");
            WanderlustError::generation("response carried no text")
        })?;

        let plan: AITripPlan = serde_json::from_str(&text).map_err(|e| {
            error!("Gemini returned text that is not a trip plan: {}", e);
            WanderlustError::generation(format!("response is not a trip plan: {e}"))
        })?;

        info!(
            days = plan.itinerary.len(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Generated trip plan for {}",
            plan.destination
        );
        Ok(plan)
    }
}

#[async_trait]
impl ItineraryGenerator for GeminiClient {
    async fn generate(&self, request: &TripRequest) -> Result<AITripPlan> {
        self.generate_trip_plan(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERATION_FAILED_MESSAGE;
    use httpmock::prelude::*;

    const PATH: &str = "/models/gemini-2.5-flash:generateContent";

    fn config(base_url: &str, api_key: Option<&str>) -> AiConfig {
        AiConfig {
            api_key: api_key.map(str::to_string),
            api_key_env: "WANDERLUST_TEST_NO_SUCH_VAR".to_string(),
            base_url: base_url.to_string(),
            ..AiConfig::default()
        }
    }

    fn request(duration: u32) -> TripRequest {
        TripRequest {
            destination: "Kyoto, Japan".to_string(),
            duration,
            interests: "temples, food".to_string(),
        }
    }

    fn envelope(text: &str) -> Value {
        json!({
            "candidates": [
                { "content": { "role": "model", "parts": [ { "text": text } ] } }
            ]
        })
    }

    fn plan_json(days: i64) -> String {
        let itinerary: Vec<Value> = (1..=days)
            .map(|day| {
                json!({
                    "day": day,
                    "title": format!("Day {day} in Kyoto"),
                    "activities": ["Visit a temple", "Try street food"]
                })
            })
            .collect();
        json!({ "destination": "Kyoto, Japan", "duration": days, "itinerary": itinerary })
            .to_string()
    }

    #[tokio::test]
    async fn test_well_formed_response_is_parsed() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(PATH)
                .header("x-goog-api-key", "test-key")
                .body_includes("Create a 3-day travel itinerary for a trip to Kyoto, Japan")
                .body_includes("\"responseMimeType\":\"application/json\"")
                .body_includes("\"responseSchema\"");
            then.status(200).json_body(envelope(&plan_json(3)));
        });

        let client = GeminiClient::new(&config(&server.base_url(), Some("test-key"))).unwrap();
        let plan = client.generate_trip_plan(&request(3)).await.unwrap();

        mock.assert();
        assert_eq!(plan.destination, "Kyoto, Japan");
        assert_eq!(plan.itinerary.len(), 3);
        assert_eq!(plan.itinerary.len() as u32, request(3).duration);
        assert_eq!(plan.itinerary[0].activities.len(), 2);
    }

    #[tokio::test]
    async fn test_plan_is_returned_unmodified() {
        let server = MockServer::start();
        let text = json!({
            "destination": "Somewhere",
            "duration": 5,
            "itinerary": [
                { "day": 3, "title": "", "activities": [] },
                { "day": 1, "title": "<b>Arrive</b>", "activities": ["Check in"] }
            ]
        })
        .to_string();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(envelope(&text));
        });

        let client = GeminiClient::new(&config(&server.base_url(), Some("test-key"))).unwrap();
        let plan = client.generate_trip_plan(&request(5)).await.unwrap();

        assert_eq!(plan.duration, 5);
        assert_eq!(plan.itinerary.len(), 2);
        assert_eq!(plan.itinerary[0].day, 3);
        assert_eq!(plan.itinerary[1].title, "<b>Arrive</b>");
    }

    #[tokio::test]
    async fn test_partial_plan_is_passed_through() {
        let server = MockServer::start();
        let text = r#"{"destination":"Kyoto","duration":2,"itinerary":[{"day":1,"title":"Arrive"}]}"#;
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(envelope(text));
        });

        let client = GeminiClient::new(&config(&server.base_url(), Some("test-key"))).unwrap();
        let plan = client.generate_trip_plan(&request(2)).await.unwrap();

        assert_eq!(plan.duration, 2);
        assert_eq!(plan.itinerary.len(), 1);
        assert_eq!(plan.itinerary[0].title, "Arrive");
        assert!(plan.itinerary[0].activities.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        // Nothing listens on the discard port; a request would surface as a
        // generation error instead of a configuration error.
        let client = GeminiClient::new(&config("http://127.0.0.1:9", None)).unwrap();
        assert!(!client.is_configured());

        let err = client.generate_trip_plan(&request(3)).await.unwrap_err();
        assert!(matches!(err, WanderlustError::Config { .. }));
        assert_eq!(err.user_message(), MISSING_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn test_non_json_text_is_a_generation_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .json_body(envelope("Sure! Here is a lovely plan for Kyoto."));
        });

        let client = GeminiClient::new(&config(&server.base_url(), Some("test-key"))).unwrap();
        let err = client.generate_trip_plan(&request(3)).await.unwrap_err();

        assert!(matches!(err, WanderlustError::Generation { .. }));
        assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_generation_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).body("<html>oops</html>");
        });

        let client = GeminiClient::new(&config(&server.base_url(), Some("test-key"))).unwrap();
        let err = client.generate_trip_plan(&request(3)).await.unwrap_err();
        assert!(matches!(err, WanderlustError::Generation { .. }));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_a_generation_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(json!({ "candidates": [] }));
        });

        let client = GeminiClient::new(&config(&server.base_url(), Some("test-key"))).unwrap();
        let err = client.generate_trip_plan(&request(3)).await.unwrap_err();
        assert!(matches!(err, WanderlustError::Generation { .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(500).body("internal");
        });

        let client = GeminiClient::new(&config(&server.base_url(), Some("test-key"))).unwrap();
        let err = client.generate_trip_plan(&request(3)).await.unwrap_err();

        assert!(matches!(err, WanderlustError::Generation { .. }));
        mock.assert();
    }

    #[tokio::test]
    async fn test_timeout_is_a_generation_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(envelope(&plan_json(1)));
        });

        let client = GeminiClient::new(&config(&server.base_url(), Some("test-key")))
            .unwrap()
            .with_timeout(Duration::from_millis(200))
            .unwrap();
        let err = client.generate_trip_plan(&request(1)).await.unwrap_err();
        assert!(matches!(err, WanderlustError::Generation { .. }));
    }

    #[test]
    fn test_schema_declares_integer_days() {
        let schema = trip_plan_schema();
        assert_eq!(schema["properties"]["duration"]["type"], "INTEGER");
        assert_eq!(
            schema["properties"]["itinerary"]["items"]["properties"]["activities"]["items"]["type"],
            "STRING"
        );
    }
}
