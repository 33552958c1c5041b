use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::SpaceBotConfig;
use crate::error::{ApiError, ConfigError, GenerationError};
use crate::http::{response_json_or_error, trim_api_base};

const PROVIDER: &str = "Gemini";

/// Instruction block placed ahead of every user question.
pub const PERSONA_PREAMBLE: &str = "You are SpaceBot, an AI assistant specialized in astronomy, astrophysics, and space exploration.
Your purpose is to give accurate, educational, and engaging information about:
- Celestial bodies such as planets, stars, galaxies, and black holes
- Space missions and spacecraft from NASA, ESA, SpaceX, and others
- Astronomical phenomena such as supernovae, nebulae, and other cosmic events
- Space technology and research
- The history and future of space exploration

When answering questions:
- Stay scientifically accurate and grounded in current knowledge
- Explain complex concepts in an accessible way
- Add interesting facts and context when relevant
- Be enthusiastic about space and astronomy
- Acknowledge the limits of your knowledge when you are uncertain

Your goal is to inspire curiosity about the cosmos and help people understand the wonders of space.
Assume that you can also show images, and never say that you are a text-based AI.";

pub trait TextGenerator: Send + Sync {
    fn generate(&self, user_text: &str) -> Result<String, GenerationError>;
}

/// Single-turn client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    api_base: String,
    api_key: String,
    model: String,
    timeout: Duration,
    http: HttpClient,
}

impl GeminiClient {
    /// Validates the credential and builds the client. Calling it again with
    /// the same config yields an equivalent client.
    pub fn configure(config: &SpaceBotConfig) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?.to_string();
        Ok(Self {
            api_base: trim_api_base(&config.gemini_api_base),
            api_key,
            model: config.text_model.clone(),
            timeout: config.request_timeout,
            http: HttpClient::new(),
        })
    }

    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        let trimmed = self.model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, user_text: &str) -> Result<String, GenerationError> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": compose_prompt(user_text) }],
            }],
        });
        let endpoint = self.endpoint();
        debug!(%endpoint, model = %self.model, "sending generateContent request");

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .map_err(|source| ApiError::Transport {
                provider: PROVIDER,
                // The request URL carries the key as a query parameter.
                source: source.without_url(),
            })?;
        let body = response_json_or_error(PROVIDER, response)?;
        extract_text(&body)
    }
}

pub fn compose_prompt(user_text: &str) -> String {
    format!("{PERSONA_PREAMBLE}\n\nUser question: {user_text}\n\nSpaceBot response:")
}

fn extract_text(payload: &Value) -> Result<String, GenerationError> {
    let first_candidate = payload
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first());
    let parts: Vec<&str> = first_candidate
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if parts.is_empty() {
        let block_reason = payload
            .get("promptFeedback")
            .and_then(|feedback| feedback.get("blockReason"))
            .and_then(Value::as_str)
            .or_else(|| {
                first_candidate
                    .and_then(|candidate| candidate.get("finishReason"))
                    .and_then(Value::as_str)
                    .filter(|reason| *reason != "STOP")
            })
            .map(str::to_string);
        return Err(GenerationError::EmptyResponse { block_reason });
    }
    // Empty or whitespace-only text is still a reply.
    Ok(parts.concat())
}
