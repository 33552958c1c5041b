use serde::{Deserialize, Serialize};

/// Placeholder used when the archive omits a title or description.
pub const MISSING_FIELD: &str = "N/A";

/// One renderable image pulled out of a media-search response.
///
/// `image_url` is always a non-empty absolute URL; records without one never
/// become an `ImageResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub title: String,
    pub description: String,
    pub image_url: String,
}

impl ImageResult {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image_url: image_url.into(),
        }
    }

    /// Description suitable for display, or `None` when the archive had nothing useful.
    pub fn display_description(&self) -> Option<&str> {
        let trimmed = self.description.trim();
        if trimmed.is_empty() || trimmed == MISSING_FIELD {
            return None;
        }
        Some(trimmed)
    }
}
