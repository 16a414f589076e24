use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CompletionBackend, CompletionRequest};
use crate::error::ChatError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_KEY_VARS: &[&str] = &["GOOGLE_API_KEY", "GEMINI_API_KEY"];

const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

#[derive(Serialize)]
struct GenerateRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Client for the Google generative-language `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    key_vars: Vec<String>,
}

impl GeminiClient {
    pub fn new(model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.to_string(),
            api_key: None,
            key_vars: DEFAULT_KEY_VARS.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Use a fixed key instead of reading the environment.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_key_vars(mut self, vars: &[&str]) -> Self {
        self.key_vars = vars.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Bounds each request at the HTTP layer. If the client cannot be built
    /// the previous client is kept; the session timeout still applies.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        match Client::builder().timeout(timeout).build() {
            Ok(client) => self.client = client,
            Err(e) => warn!(error = %e, ?timeout, "failed to build HTTP client with timeout, keeping previous client"),
        }
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The key is looked up on every call, so a missing key only fails the
    /// message being sent.
    fn resolve_api_key(&self) -> Result<String, ChatError> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        self.key_vars
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or(ChatError::MissingCredential)
    }

    pub async fn generate(&self, system_instruction: &str, user_text: &str) -> Result<String, ChatError> {
        let api_key = self.resolve_api_key()?;
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);

        let request = GenerateRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: system_instruction }],
            },
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart { text: user_text }],
            }],
        };

        debug!(model = %self.model, "sending generateContent request");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "generateContent failed");
            return Err(classify_failure(status.as_u16(), body));
        }

        let parsed: GenerateResponse = response.json().await?;
        extract_text(parsed)
    }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatError> {
        self.generate(&request.system_instruction, &request.user_text).await
    }
}

/// Gemini reports a bad key as 400 INVALID_ARGUMENT, so the body is only
/// consulted for 400s. Any other status is a plain HTTP failure.
fn classify_failure(status: u16, body: String) -> ChatError {
    match status {
        401 | 403 => ChatError::Unauthorized(body),
        400 if body.to_lowercase().contains("api key") => ChatError::Unauthorized(body),
        _ => ChatError::Http { status, body },
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, ChatError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ChatError::ContentBlocked { reason });
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ChatError::EmptyResponse)?;

    if let Some(reason) = candidate
        .finish_reason
        .filter(|r| BLOCKING_FINISH_REASONS.contains(&r.as_str()))
    {
        return Err(ChatError::ContentBlocked { reason });
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ChatError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use mockito::Matcher;
    use serde_json::json;

    const PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
        GeminiClient::new(DEFAULT_MODEL)
            .with_base_url(&server.url())
            .with_api_key(Some("test-key".to_string()))
    }

    #[tokio::test]
    async fn test_generate_returns_joined_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "system_instruction": {"parts": [{"text": "be brief"}]},
                "contents": [{"role": "user", "parts": [{"text": "what does he build?"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "Systems "}, {"text": "that survive."}]},
                        "finishReason": "STOP"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = client_for(&server).generate("be brief", "what does he build?").await.unwrap();
        assert_eq!(text, "Systems that survive.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", PATH).expect(0).create_async().await;

        let client = GeminiClient::new(DEFAULT_MODEL)
            .with_base_url(&server.url())
            .with_key_vars(&["FOLIO_TEST_KEY_THAT_IS_NEVER_SET"]);
        let err = client.generate("sys", "hi").await.unwrap_err();

        assert!(matches!(err, ChatError::MissingCredential));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_key_is_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(400)
            .with_body(r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).generate("sys", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_content_blocked() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(json!({"promptFeedback": {"blockReason": "SAFETY"}}).to_string())
            .create_async()
            .await;

        let err = client_for(&server).generate("sys", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::ContentBlocked { ref reason } if reason == "SAFETY"));
    }

    #[tokio::test]
    async fn test_safety_finish_reason_is_content_blocked() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(json!({"candidates": [{"finishReason": "SAFETY"}]}).to_string())
            .create_async()
            .await;

        let err = client_for(&server).generate("sys", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::ContentBlocked { .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_http() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", PATH).with_status(503).with_body("overloaded").create_async().await;

        let err = client_for(&server).generate("sys", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Http { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_outage_mentioning_key_is_connectivity() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(503)
            .with_body("Backend unavailable while validating API key, try again later.")
            .create_async()
            .await;

        let err = client_for(&server).generate("sys", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Http { status: 503, .. }));
        assert_eq!(err.kind(), ErrorKind::Connectivity);
    }

    #[tokio::test]
    async fn test_forbidden_is_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", PATH).with_status(403).with_body("PERMISSION_DENIED").create_async().await;

        let err = client_for(&server).generate("sys", "hi").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_rate_limit_mentioning_key_is_http() {
        let err = classify_failure(429, "Quota exceeded for API key".to_string());
        assert!(matches!(err, ChatError::Http { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_with_timeout_keeps_model_and_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_body(json!({"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}).to_string())
            .create_async()
            .await;

        let client = client_for(&server).with_timeout(Duration::from_secs(5));
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.generate("sys", "hi").await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[test]
    fn test_empty_candidates_is_empty_response() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(extract_text(parsed), Err(ChatError::EmptyResponse)));
    }
}
