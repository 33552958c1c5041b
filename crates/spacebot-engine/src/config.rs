use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::http::trim_api_base;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_IMAGE_API_BASE: &str = "https://images-api.nasa.gov";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 30.0;

/// Value shipped in the sample `.env`; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "your_actual_api_key";

const MIN_REQUEST_TIMEOUT_SECS: f64 = 1.0;
const MAX_REQUEST_TIMEOUT_SECS: f64 = 300.0;

/// Settings shared by both API clients, built once at startup.
#[derive(Clone)]
pub struct SpaceBotConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub text_model: String,
    pub image_api_base: String,
    pub request_timeout: Duration,
}

impl Default for SpaceBotConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_api_base: DEFAULT_IMAGE_API_BASE.to_string(),
            request_timeout: Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for SpaceBotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpaceBotConfig")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini_api_base", &self.gemini_api_base)
            .field("text_model", &self.text_model)
            .field("image_api_base", &self.image_api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl SpaceBotConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(non_empty_env)
    }

    /// Builds the config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            gemini_api_key: get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")),
            gemini_api_base: get("GEMINI_API_BASE")
                .map(|value| trim_api_base(&value))
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.gemini_api_base),
            text_model: get("SPACEBOT_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_api_base: get("NASA_IMAGES_API_BASE")
                .map(|value| trim_api_base(&value))
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.image_api_base),
            request_timeout: get("SPACEBOT_REQUEST_TIMEOUT")
                .and_then(|value| value.parse::<f64>().ok())
                .filter(|secs| secs.is_finite())
                .map(|secs| {
                    Duration::from_secs_f64(
                        secs.clamp(MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS),
                    )
                })
                .unwrap_or(defaults.request_timeout),
        }
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.text_model = model.trim().to_string();
        }
        self
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.gemini_api_key.as_deref() {
            None => Err(ConfigError::CredentialMissing { reason: "missing" }),
            Some(PLACEHOLDER_API_KEY) => Err(ConfigError::CredentialMissing {
                reason: "placeholder value",
            }),
            Some(key) => Ok(key),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
