use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set correctly ({reason})")]
    CredentialMissing { reason: &'static str },
}

/// Failure talking to one of the upstream HTTP APIs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} request failed ({status}): {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{provider} returned invalid JSON payload: {source}")]
    Parse {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport { source, .. } if source.is_timeout())
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(
        "Gemini returned no text (reason: {})",
        .block_reason.as_deref().unwrap_or("unspecified")
    )]
    EmptyResponse { block_reason: Option<String> },
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("NASA image search response has no `collection` object")]
    MissingCollection,
}

impl SearchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SearchError::Api(api) if api.is_timeout())
    }
}
