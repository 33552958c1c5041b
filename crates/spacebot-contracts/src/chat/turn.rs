use serde::{Deserialize, Serialize};

use crate::media::ImageResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Out-of-band signal attached to an assistant turn.
///
/// Text generation and image search both degrade instead of failing the turn;
/// notices keep the degraded cases distinguishable from a normal reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnNotice {
    GenerationFailed { reason: String },
    SearchFailed { reason: String },
    NoImagesFound { query: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub images: Vec<ImageResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<TurnNotice>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            images: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn assistant(text: impl Into<String>, images: Vec<ImageResult>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            images,
            notices: Vec::new(),
        }
    }

    pub fn with_notices(mut self, notices: Vec<TurnNotice>) -> Self {
        self.notices = notices;
        self
    }

    pub fn generation_failed(&self) -> bool {
        self.notices
            .iter()
            .any(|notice| matches!(notice, TurnNotice::GenerationFailed { .. }))
    }
}
