//! OpenAI chat-completions backend.

use super::{Backend, BackendFailure, FailureKind, Prompt};
use crate::config::{FlashgenConfig, API_KEY_ENV};
use crate::error::{FlashError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FlashError::Backend(format!("Failed to create HTTP client: {}", e)))?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Builds a backend from config, reading the key from `OPENAI_API_KEY`.
    pub fn from_config(config: &FlashgenConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                FlashError::Config(format!(
                    "{} is not set (set it, or use the demo backend with --demo)",
                    API_KEY_ENV
                ))
            })?;

        Self::new(
            api_key,
            config.api_base.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl Backend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn complete(&self, prompt: &Prompt) -> std::result::Result<String, BackendFailure> {
        let mut messages = Vec::with_capacity(2);
        if !prompt.system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &prompt.system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        let wants_json = !matches!(prompt.kind, super::PromptKind::Ping);
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
            response_format: wants_json.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        debug!(model = %self.model, endpoint = %self.endpoint(), "sending chat request");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(classify_transport)?;

        let status = response.status();
        let body = response.text().map_err(classify_transport)?;
        if !status.is_success() {
            return Err(classify_status(status.as_u16(), &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| BackendFailure::fatal(format!("Malformed chat response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendFailure::fatal("Empty response from model"))
    }
}

fn classify_transport(err: reqwest::Error) -> BackendFailure {
    if err.is_timeout() || err.is_connect() {
        BackendFailure::transient(format!("Request failed: {}", err))
    } else {
        BackendFailure::fatal(format!("Request failed: {}", err))
    }
}

/// Maps an HTTP error status (and body) onto a failure kind.
fn classify_status(status: u16, body: &str) -> BackendFailure {
    match status {
        401 | 403 => BackendFailure::new(
            FailureKind::Auth,
            "Invalid or expired API key. Check OPENAI_API_KEY.",
        ),
        429 if body.contains("insufficient_quota") => BackendFailure::new(
            FailureKind::Quota,
            "API quota exceeded. Check your account billing.",
        ),
        408 | 409 | 429 | 500..=599 => {
            BackendFailure::transient(format!("Backend returned {}: {}", status, snippet(body)))
        }
        _ => BackendFailure::fatal(format!("Backend returned {}: {}", status, snippet(body))),
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_not_transient() {
        assert_eq!(classify_status(401, "").kind, FailureKind::Auth);
        assert_eq!(classify_status(403, "").kind, FailureKind::Auth);
    }

    #[test]
    fn quota_is_distinguished_from_rate_limit() {
        let quota = classify_status(429, r#"{"error":{"code":"insufficient_quota"}}"#);
        assert_eq!(quota.kind, FailureKind::Quota);

        let rate = classify_status(429, r#"{"error":{"code":"rate_limit_exceeded"}}"#);
        assert!(rate.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(classify_status(500, "oops").is_transient());
        assert!(classify_status(503, "").is_transient());
        assert!(!classify_status(400, "bad request").is_transient());
    }

    #[test]
    fn long_bodies_are_shortened() {
        let failure = classify_status(400, &"x".repeat(1000));
        assert!(failure.message.chars().count() < 250);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let backend = OpenAiBackend::new(
            "key",
            "http://localhost:9/v1/",
            "gpt-4o",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:9/v1/chat/completions");
    }
}
