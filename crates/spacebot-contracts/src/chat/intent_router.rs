/// Phrases that mark a message as asking for imagery.
///
/// Matching is a plain case-insensitive substring test, so "see" also fires
/// inside "I see your point".
pub const IMAGE_KEYWORDS: &[&str] = &[
    "image", "show me", "picture", "photo", "visualize", "see", "images", "pictures", "photos",
];

pub fn wants_images(text: &str) -> bool {
    let lowered = text.to_lowercase();
    IMAGE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Turns a chat message into an archive search query.
///
/// Everything that is not alphanumeric or whitespace is dropped and the
/// result is trimmed; the rest of the message is kept verbatim.
pub fn derive_query(text: &str) -> String {
    text.chars()
        .filter(|ch| ch.is_alphanumeric() || ch.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}
