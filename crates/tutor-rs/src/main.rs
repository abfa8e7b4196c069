//! Ask the study-notes tutor a single question from the terminal.
//!
//! Reads the API key from `OPENAI_API_KEY` (or a `.env` file). Without a key
//! the reply comes from the demo fallback pool.
//!
//! # Examples
//!
//! ```sh
//! # Explain mode
//! tutor --mode explain --message "What is the Calvin cycle?"
//!
//! # Continue a quiz with prior turns
//! tutor --mode quiz --message "B" --history turns.json
//!
//! # Pipe the question from stdin and print the assembled prompt only
//! echo "Why are leaves green?" | tutor --mode simplify --stdin --print-prompt
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tutor_rs::conversation::load_history;
use tutor_rs::prelude::*;

/// Ask the study-notes tutor a single question.
#[derive(Parser)]
#[command(name = "tutor")]
struct Cli {
    // ── Request ────────────────────────────────────────────────
    /// Learning mode: explain, quiz, or simplify
    #[arg(long, default_value = "explain")]
    mode: Mode,

    /// Student message
    #[arg(long)]
    message: Option<String>,

    /// Read the message from stdin
    #[arg(long)]
    stdin: bool,

    /// JSON file with prior turns: [{"role": "user", "content": "..."}]
    #[arg(long)]
    history: Option<PathBuf>,

    /// Topic name to focus on
    #[arg(long)]
    topic: Option<String>,

    /// Language to answer in
    #[arg(long)]
    language: Option<String>,

    // ── Completion API ─────────────────────────────────────────
    /// API key for the completion service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat-completions endpoint
    #[arg(long, env = "OPENAI_API_URL", default_value = tutor_rs::DEFAULT_API_URL)]
    api_url: String,

    /// Model identifier
    #[arg(long, env = "OPENAI_MODEL", default_value = tutor_rs::DEFAULT_MODEL)]
    model: String,

    /// Per-call timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,

    // ── Output ─────────────────────────────────────────────────
    /// Print the assembled prompt instead of calling the API
    #[arg(long)]
    print_prompt: bool,

    /// Report on stderr whether the reply came from the model or the fallback
    #[arg(long)]
    verbose: bool,
}

fn read_stdin_content() -> Result<String, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    Ok(buf.trim().to_string())
}

fn build_message(cli: &Cli) -> Result<String, String> {
    let stdin_text = if cli.stdin {
        Some(read_stdin_content()?)
    } else {
        None
    };

    match (&cli.message, stdin_text) {
        (Some(msg), Some(piped)) => Ok(format!("{msg}\n\n{piped}")),
        (Some(msg), None) => Ok(msg.clone()),
        (None, Some(piped)) => Ok(piped),
        (None, None) => Err("provide --message, --stdin, or both".to_string()),
    }
}

async fn run(cli: Cli) -> Result<String, String> {
    let message = build_message(&cli)?;
    if message.trim().is_empty() {
        return Err("message must not be empty".to_string());
    }
    let history = match &cli.history {
        Some(path) => load_history(path)?,
        None => Vec::new(),
    };

    let request = TutorRequest::new(message, cli.mode)
        .with_history(history)
        .with_topic(cli.topic)
        .with_language(cli.language);

    let config = GatewayConfig::default()
        .with_api_key(cli.api_key)
        .with_api_url(cli.api_url)
        .with_model(cli.model)
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let gateway = config.build_gateway().map_err(|e| e.to_string())?;
    let tutor = Tutor::new(Arc::new(gateway));

    if cli.print_prompt {
        return Ok(tutor.prompt_for(&request));
    }

    let reply = tutor.reply(&request).await;
    if cli.verbose {
        eprintln!("  [source] {:?}", reply.source);
    }
    Ok(reply.text)
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
