//! locolo - terminal chat with the Locolo event assistant

mod assistant;
mod config;
mod conversation;
mod error;
mod logging;
mod ui;

use assistant::{Assistant, AssistantEvent, ScriptedAssistant, spawn_request};
use clap::Parser;
use config::Config;
use conversation::Conversation;
use error::Error;
use locolo_tui::{ChatMessage, Theme};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// locolo - find something to do tonight
#[derive(Parser, Debug)]
#[command(name = "locolo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ~/.config/locolo/config.toml)
    #[arg(long, env = "LOCOLO_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Seed the conversation from a JSON array of messages
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Ask a single question, print the reply and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Use the light theme
    #[arg(long)]
    light: bool,

    /// Write debug logs to <config dir>/locolo.log
    #[arg(short, long)]
    verbose: bool,

    /// Override the delay before the first token
    #[arg(long)]
    first_token_delay_ms: Option<u64>,

    /// Override the delay between tokens
    #[arg(long)]
    token_delay_ms: Option<u64>,
}

fn load_transcript(path: &Path) -> error::Result<Vec<ChatMessage>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::Transcript {
        path: path.to_path_buf(),
        source,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        logging::init(&Config::config_dir().join("locolo.log"))?;
    }

    let config_path = args.config.clone().unwrap_or_else(Config::config_path);

    if args.init_config {
        Config::init(&config_path)?;
        println!("Config file created at: {}", config_path.display());
        println!("\nExample config:\n{}", config::example_config());
        return Ok(());
    }

    let mut cfg = Config::load_from(&config_path)?;
    if let Some(ms) = args.first_token_delay_ms {
        cfg.assistant.first_token_delay_ms = ms;
    }
    if let Some(ms) = args.token_delay_ms {
        cfg.assistant.token_delay_ms = ms;
    }
    info!(config = %config_path.display(), "config loaded");

    let conversation = match &args.transcript {
        Some(path) => Conversation::from_messages(load_transcript(path)?)?,
        None => Conversation::new(),
    };

    let assistant: Arc<dyn Assistant> = Arc::new(ScriptedAssistant::new(&cfg.assistant));

    if let Some(command) = args.command {
        return run_command(conversation, assistant, &command).await;
    }

    let theme = if args.light {
        Theme::light()
    } else {
        Theme::by_name(&cfg.theme)
    };

    ui::run_tui(conversation, &cfg, theme, assistant).await
}

/// Non-interactive mode: stream one reply to stdout
async fn run_command(
    mut conversation: Conversation,
    assistant: Arc<dyn Assistant>,
    command: &str,
) -> anyhow::Result<()> {
    let Some(request) = conversation.submit(command) else {
        anyhow::bail!("Nothing to ask");
    };

    println!("you> {}", command);
    println!();

    let (tx, mut rx) = mpsc::channel(256);
    let handle = spawn_request(assistant, request, tx);

    let mut stdout = std::io::stdout();
    while let Some(event) = rx.recv().await {
        match &event {
            AssistantEvent::Delta { text, .. } => {
                print!("{}", text);
                stdout.flush()?;
            }
            AssistantEvent::Finished { .. } => println!(),
            AssistantEvent::Failed { message, .. } => eprintln!("Error: {}", message),
        }
        conversation.apply(event);
        if !conversation.is_loading() {
            break;
        }
    }

    handle.await?;
    Ok(())
}
