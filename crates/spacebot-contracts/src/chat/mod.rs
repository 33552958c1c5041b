mod command_registry;
mod intent_router;
mod turn;

pub use command_registry::{parse_command, ChatCommand, CHAT_HELP_COMMANDS};
pub use intent_router::{derive_query, wants_images, IMAGE_KEYWORDS};
pub use turn::{ChatTurn, Role, TurnNotice};
