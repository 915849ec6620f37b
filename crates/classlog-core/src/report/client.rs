//! Remote report client with bounded retry and exponential backoff.
//!
//! ## Retry contract
//!
//! Attempts are strictly sequential, bounded by `max_attempts`. A 5xx
//! status, a transport failure or a success envelope missing the
//! generated-text path all count as retryable and share one backoff
//! schedule: `2^attempt` seconds after the attempt numbered `attempt`
//! (so 2 s after the first failure, then 4 s). Any other non-success
//! status fails immediately with the message extracted from the error
//! payload. Once the bound is hit the last retryable error propagates
//! unchanged.
//!
//! The API key is resolved once per top-level call, before the first
//! network attempt, and reused across every attempt of that call.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use super::credentials::CredentialStore;
use super::prompt;
use super::types::{GenerationParams, ReportError};
use crate::session::SessionSnapshot;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Client for the generative-language endpoint.
pub struct ReportClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    max_attempts: u32,
    store: Arc<dyn CredentialStore>,
}

impl ReportClient {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_endpoint(store, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_MAX_ATTEMPTS)
    }

    /// Build a client against a specific endpoint and model. Tests point
    /// this at a mock server.
    pub fn with_endpoint(
        store: Arc<dyn CredentialStore>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        max_attempts: u32,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            max_attempts,
            store,
        }
    }

    /// Rewrite a single qualitative note.
    pub async fn polish(&self, note: &str) -> Result<String, ReportError> {
        self.generate(&prompt::polish_prompt(note), GenerationParams::polish())
            .await
    }

    /// Generate a narrative Markdown report from a session snapshot.
    pub async fn generate_report(&self, snapshot: &SessionSnapshot) -> Result<String, ReportError> {
        self.generate(&prompt::report_prompt(snapshot), GenerationParams::report())
            .await
    }

    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, ReportError> {
        let key = self.store.get()?.ok_or(ReportError::MissingCredential)?;
        let mut attempt = 0;
        loop {
            let err = match self.attempt(&key, prompt, &params).await {
                Ok(text) => return Ok(text),
                Err(err) => err,
            };
            if !err.is_retryable() {
                return Err(err);
            }
            attempt += 1;
            if attempt >= self.max_attempts {
                return Err(err);
            }
            tokio::time::sleep(backoff_delay(attempt)).await;
        }
    }

    /// One network attempt: POST the fixed envelope, classify the status,
    /// extract the generated text.
    async fn attempt(
        &self,
        key: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ReportError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": params.temperature,
                "maxOutputTokens": params.max_output_tokens,
            },
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status.is_server_error() {
                return Err(ReportError::Server {
                    status: status.as_u16(),
                });
            }
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_owned))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_owned()
                });
            return Err(ReportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        extract_text(&body).ok_or(ReportError::MissingText)
    }
}

/// Delay before the retry numbered `attempt` (1-based): `2^attempt`
/// seconds, no jitter.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(2u64.pow(attempt) * 1000)
}

/// The generated text lives at `candidates[0].content.parts[0].text`.
fn extract_text(body: &Value) -> Option<String> {
    body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_two_seconds() {
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn extract_text_reads_the_nested_path() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Well done." }] } }]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("Well done."));
    }

    #[test]
    fn extract_text_rejects_truncated_envelopes() {
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
        assert_eq!(extract_text(&json!({})), None);
        assert_eq!(
            extract_text(&json!({ "candidates": [{ "content": {} }] })),
            None
        );
    }
}
