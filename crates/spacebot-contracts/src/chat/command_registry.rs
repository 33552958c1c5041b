#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Quit,
}

#[derive(Clone, Copy, Debug)]
struct CommandSpec {
    command: &'static str,
    action: ChatCommand,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "help",
        action: ChatCommand::Help,
    },
    CommandSpec {
        command: "quit",
        action: ChatCommand::Quit,
    },
    CommandSpec {
        command: "exit",
        action: ChatCommand::Quit,
    },
];

pub const CHAT_HELP_COMMANDS: &[&str] = &["/help", "/quit", "/exit"];

/// Recognizes a REPL slash command. Anything else, including unknown slash
/// words, is left for the conversation.
pub fn parse_command(text: &str) -> Option<ChatCommand> {
    let slash_tail = text.trim().strip_prefix('/')?;
    let command = slash_tail.trim().to_ascii_lowercase();
    COMMANDS
        .iter()
        .find(|spec| spec.command == command)
        .map(|spec| spec.action)
}
