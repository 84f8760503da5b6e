use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::RefineError;

/// The LLM invocation capability the core depends on. Vendor identity,
/// auth, and retries live outside the core; this trait is the seam the
/// core calls through, satisfying the "accepts an LLM invocation
/// capability" requirement with something a fake can implement.
///
/// Boxed-future return (rather than `async fn` in the trait) keeps this
/// object-safe so the pipeline can hold a `Box<dyn LlmClient>`.
pub trait LlmClient: Send + Sync {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RefineError>> + Send + 'a>>;
}

/// Per-request knobs for the default client, mirroring
/// `LlmRefinementConfig`'s model-selection fields.
#[derive(Debug, Clone)]
pub struct AnthropicClientConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl AnthropicClientConfig {
    pub fn from_env(model: impl Into<String>, max_tokens: u32, temperature: f64) -> Result<Self, RefineError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| RefineError::LlmTransport("ANTHROPIC_API_KEY not set".to_string()))?;
        Ok(Self {
            api_key,
            model: model.into(),
            max_tokens,
            temperature,
        })
    }
}

/// Default `LlmClient` implementation, talking to the Anthropic Messages
/// API over `reqwest`. One of several vendor clients the core could be
/// wired to; the core itself never references this type directly.
pub struct AnthropicLlmClient {
    http: Client,
    config: AnthropicClientConfig,
}

impl AnthropicLlmClient {
    pub fn new(config: AnthropicClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }
}

impl LlmClient for AnthropicLlmClient {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RefineError>> + Send + 'a>> {
        Box::pin(async move {
            let request = AnthropicRequest {
                model: self.config.model.clone(),
                max_tokens: self.config.max_tokens,
                temperature: Some(self.config.temperature),
                system: Some(system.to_string()),
                messages: vec![Message {
                    role: "user".to_string(),
                    content: user.to_string(),
                }],
            };

            let response = self
                .http
                .post("https://api.anthropic.com/v1/messages")
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| RefineError::LlmTransport(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(RefineError::LlmTransport(format!("{}: {}", status, body)));
            }

            let parsed: AnthropicResponse = response
                .json()
                .await
                .map_err(|e| RefineError::LlmTransport(e.to_string()))?;

            parsed
                .content
                .into_iter()
                .find(|c| c.content_type == "text")
                .map(|c| c.text)
                .ok_or_else(|| RefineError::LlmParse("no text content in response".to_string()))
        })
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

/// Test double returning a canned reply, or a transport error when
/// `fail` is set. Lets refinement logic be exercised without a network.
pub struct FakeLlmClient {
    pub reply: String,
    pub fail: bool,
}

impl FakeLlmClient {
    pub fn ok(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
        }
    }
}

impl LlmClient for FakeLlmClient {
    fn complete<'a>(
        &'a self,
        _system: &'a str,
        _user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RefineError>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail {
                Err(RefineError::LlmTransport("simulated transport failure".to_string()))
            } else {
                Ok(self.reply.clone())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_client_returns_canned_reply() {
        let client = FakeLlmClient::ok(r#"{"identifiedSpeakers":{},"updates":[]}"#);
        let reply = client.complete("sys", "user").await.unwrap();
        assert!(reply.contains("identifiedSpeakers"));
    }

    #[tokio::test]
    async fn fake_client_can_simulate_failure() {
        let client = FakeLlmClient::failing();
        let result = client.complete("sys", "user").await;
        assert!(result.is_err());
    }
}
