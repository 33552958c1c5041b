use std::fmt::{self, Write as _};
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spacebot_contracts::chat::{parse_command, ChatCommand, ChatTurn, TurnNotice, CHAT_HELP_COMMANDS};
use spacebot_contracts::media::ImageResult;
use spacebot_contracts::text::truncate_chars;
use spacebot_contracts::transcript::TranscriptWriter;
use spacebot_engine::{
    ConfigError, Conversation, GeminiClient, ImageSearch, NasaImageClient, SpaceBotConfig,
    TurnStage, DEFAULT_MEDIA_TYPE, MAX_TURN_IMAGES,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "spacebot",
    version,
    about = "Your friendly guide to the cosmos, powered by Gemini and NASA"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Chat(ChatArgs),
    Ask(AskArgs),
    Search(SearchArgs),
}

#[derive(Debug, Parser)]
struct ChatArgs {
    #[arg(long)]
    text_model: Option<String>,
    #[arg(long)]
    transcript: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_MEDIA_TYPE)]
    media_type: String,
}

#[derive(Debug, Parser)]
struct AskArgs {
    #[arg(long)]
    prompt: String,
    #[arg(long)]
    text_model: Option<String>,
    #[arg(long, default_value = DEFAULT_MEDIA_TYPE)]
    media_type: String,
}

#[derive(Debug, Parser)]
struct SearchArgs {
    #[arg(long)]
    query: String,
    #[arg(long, default_value = DEFAULT_MEDIA_TYPE)]
    media_type: String,
    #[arg(long, default_value_t = MAX_TURN_IMAGES)]
    limit: usize,
}

const SEARCH_DESCRIPTION_MAX_CHARS: usize = 100;

fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("spacebot error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Chat(args) => run_chat(args),
        Command::Ask(args) => run_ask(args),
        Command::Search(args) => run_search(args),
    }
}

fn load_config(text_model: Option<String>) -> SpaceBotConfig {
    let config = SpaceBotConfig::from_env();
    match text_model {
        Some(model) => config.with_text_model(model),
        None => config,
    }
}

fn build_conversation(
    config: &SpaceBotConfig,
    media_type: &str,
) -> Result<Conversation, ConfigError> {
    let generator = GeminiClient::configure(config)?;
    Ok(Conversation::new(generator, NasaImageClient::new(config)).with_media_type(media_type))
}

fn report_config_error(err: &ConfigError) {
    eprintln!("🚨 {err}.");
    eprintln!("Create a `.env` file and set `GEMINI_API_KEY=your_key_here`.");
}

fn run_chat(args: ChatArgs) -> Result<i32> {
    let config = load_config(args.text_model);
    let conversation = match build_conversation(&config, &args.media_type) {
        Ok(conversation) => conversation,
        Err(err) => {
            report_config_error(&err);
            return Ok(1);
        }
    };
    let writer = args.transcript.map(TranscriptWriter::new);
    let mut transcript: Vec<ChatTurn> = Vec::new();
    info!(
        model = %config.text_model,
        session_id = writer.as_ref().map(TranscriptWriter::session_id),
        "chat session started"
    );

    println!("🪐 SpaceBot ({})", config.text_model);
    println!("Ask SpaceBot about the universe. Type /help for commands.");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match stdin.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match parse_command(input) {
            Some(ChatCommand::Help) => {
                println!("Commands: {}", CHAT_HELP_COMMANDS.join(" "));
                continue;
            }
            Some(ChatCommand::Quit) => break,
            None => {}
        }

        append_turn(&mut transcript, writer.as_ref(), ChatTurn::user(input))?;
        let reply = conversation.respond_with_progress(input, print_stage);
        print!("{}", render_turn(&reply)?);
        append_turn(&mut transcript, writer.as_ref(), reply)?;
    }

    println!("Session ended after {} messages.", transcript.len());
    Ok(0)
}

fn run_ask(args: AskArgs) -> Result<i32> {
    let config = load_config(args.text_model);
    let conversation = match build_conversation(&config, &args.media_type) {
        Ok(conversation) => conversation,
        Err(err) => {
            report_config_error(&err);
            return Ok(1);
        }
    };
    let reply = conversation.respond_with_progress(&args.prompt, print_stage);
    print!("{}", render_turn(&reply)?);
    Ok(if reply.generation_failed() { 1 } else { 0 })
}

fn run_search(args: SearchArgs) -> Result<i32> {
    let config = SpaceBotConfig::from_env();
    let client = NasaImageClient::new(&config);
    let results = client.search(&args.query, &args.media_type);
    print!("{}", render_search_results(&args.query, &results, args.limit)?);
    Ok(0)
}

fn append_turn(
    transcript: &mut Vec<ChatTurn>,
    writer: Option<&TranscriptWriter>,
    turn: ChatTurn,
) -> Result<()> {
    if let Some(writer) = writer {
        writer.append(&turn)?;
    }
    transcript.push(turn);
    Ok(())
}

fn print_stage(stage: TurnStage) {
    if let Some(status) = stage_status(stage) {
        eprintln!("{status}");
    }
}

fn stage_status(stage: TurnStage) -> Option<&'static str> {
    match stage {
        TurnStage::AwaitingModelResponse => Some("Thinking..."),
        TurnStage::SearchingImages => Some("Searching NASA's image archive..."),
        TurnStage::CheckingImageIntent | TurnStage::Done => None,
    }
}

fn render_turn(turn: &ChatTurn) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if turn.generation_failed() {
        writeln!(out, "❌ {}", turn.text)?;
    } else {
        writeln!(out, "{}", turn.text)?;
    }

    if !turn.images.is_empty() {
        writeln!(out, "🔭 NASA Images:")?;
        for (idx, image) in turn.images.iter().enumerate() {
            writeln!(out, "  {}. {}", idx + 1, image.title)?;
            writeln!(out, "     {}", image.image_url)?;
            writeln!(
                out,
                "     {}",
                image
                    .display_description()
                    .unwrap_or("No description available.")
            )?;
        }
    }

    for notice in &turn.notices {
        match notice {
            TurnNotice::NoImagesFound { .. } => writeln!(out, "No images found for this topic.")?,
            TurnNotice::SearchFailed { reason } => writeln!(out, "NASA API error: {reason}")?,
            TurnNotice::GenerationFailed { .. } => {}
        }
    }
    Ok(out)
}

fn render_search_results(
    query: &str,
    results: &[ImageResult],
    limit: usize,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if results.is_empty() {
        writeln!(out, "No images found for '{query}'.")?;
        return Ok(out);
    }
    writeln!(out, "Found {} images for '{query}':", results.len())?;
    for image in results.iter().take(limit) {
        writeln!(out, "  Title: {}", image.title)?;
        writeln!(
            out,
            "  Description: {}",
            truncate_chars(&image.description, SEARCH_DESCRIPTION_MAX_CHARS, "...")
        )?;
        writeln!(out, "  URL: {}", image.image_url)?;
        writeln!(out, "---")?;
    }
    Ok(out)
}
