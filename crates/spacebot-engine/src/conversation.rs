use spacebot_contracts::chat::{derive_query, wants_images, ChatTurn, TurnNotice};
use tracing::{info, warn};

use crate::gemini::TextGenerator;
use crate::nasa::{ImageSearch, DEFAULT_MEDIA_TYPE};

/// Most images attached to a single assistant turn.
pub const MAX_TURN_IMAGES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    AwaitingModelResponse,
    CheckingImageIntent,
    SearchingImages,
    Done,
}

/// Runs one user message through text generation and, when the message asks
/// for imagery, an archive search. Holds no state between turns.
pub struct Conversation {
    generator: Box<dyn TextGenerator>,
    images: Box<dyn ImageSearch>,
    media_type: String,
}

impl Conversation {
    pub fn new<G, S>(generator: G, images: S) -> Self
    where
        G: TextGenerator + 'static,
        S: ImageSearch + 'static,
    {
        Self {
            generator: Box::new(generator),
            images: Box::new(images),
            media_type: DEFAULT_MEDIA_TYPE.to_string(),
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    pub fn respond(&self, user_text: &str) -> ChatTurn {
        self.respond_with_progress(user_text, |_| {})
    }

    /// Like [`Conversation::respond`], reporting each stage as it is entered.
    pub fn respond_with_progress<F>(&self, user_text: &str, mut on_stage: F) -> ChatTurn
    where
        F: FnMut(TurnStage),
    {
        let mut notices = Vec::new();

        on_stage(TurnStage::AwaitingModelResponse);
        let text = match self.generator.generate(user_text) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "text generation failed");
                let reason = err.to_string();
                notices.push(TurnNotice::GenerationFailed {
                    reason: reason.clone(),
                });
                format!("Error generating response: {reason}")
            }
        };

        on_stage(TurnStage::CheckingImageIntent);
        let mut images = Vec::new();
        if wants_images(user_text) {
            on_stage(TurnStage::SearchingImages);
            let query = derive_query(user_text);
            match self.images.try_search(&query, &self.media_type) {
                Ok(mut found) => {
                    info!(query = %query, found = found.len(), "image search finished");
                    found.truncate(MAX_TURN_IMAGES);
                    if found.is_empty() {
                        notices.push(TurnNotice::NoImagesFound { query });
                    }
                    images = found;
                }
                Err(err) => {
                    warn!(
                        query = %query,
                        timed_out = err.is_timeout(),
                        error = %err,
                        "image search failed"
                    );
                    notices.push(TurnNotice::SearchFailed {
                        reason: err.to_string(),
                    });
                }
            }
        }

        on_stage(TurnStage::Done);
        ChatTurn::assistant(text, images).with_notices(notices)
    }
}
