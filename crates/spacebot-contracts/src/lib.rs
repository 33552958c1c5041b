pub mod chat;
pub mod media;
pub mod text;
pub mod transcript;
