use reqwest::blocking::Response as HttpResponse;
use serde_json::Value;
use spacebot_contracts::text::truncate_chars;

use crate::error::ApiError;

const ERROR_BODY_MAX_CHARS: usize = 512;

pub(crate) fn response_json_or_error(
    provider: &'static str,
    response: HttpResponse,
) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|source| ApiError::Transport { provider, source })?;
    if !status.is_success() {
        return Err(ApiError::Status {
            provider,
            status: status.as_u16(),
            body: truncate_chars(&body, ERROR_BODY_MAX_CHARS, "…"),
        });
    }
    serde_json::from_str(&body).map_err(|source| ApiError::Parse { provider, source })
}

pub(crate) fn trim_api_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
