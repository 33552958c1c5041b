mod config;
mod conversation;
mod error;
mod gemini;
mod http;
mod nasa;

#[cfg(test)]
mod test_support;

pub use config::{
    SpaceBotConfig, DEFAULT_GEMINI_API_BASE, DEFAULT_IMAGE_API_BASE, DEFAULT_TEXT_MODEL,
    PLACEHOLDER_API_KEY,
};
pub use conversation::{Conversation, TurnStage, MAX_TURN_IMAGES};
pub use error::{ApiError, ConfigError, GenerationError, SearchError};
pub use gemini::{compose_prompt, GeminiClient, TextGenerator, PERSONA_PREAMBLE};
pub use nasa::{parse_search_response, ImageSearch, NasaImageClient, DEFAULT_MEDIA_TYPE};
