//! Study-notes tutor HTTP server.
//!
//! Serves `GET /api/health` and `POST /api/chat`, plus the frontend from
//! `--static-dir` when it exists. Everything except the health check needs
//! HTTP Basic credentials.
//!
//! # Usage
//!
//! ```bash
//! OPENAI_API_KEY=sk-... cargo run -p tutor-web
//! cargo run -p tutor-web -- --port 8080 --auth-user alice --auth-pass s3cret
//! cargo run -p tutor-web -- --max-retries 2 --max-history-turns 20
//! ```
//!
//! Without an API key every chat is answered from the demo fallback pool.
//!
//! ```bash
//! curl -u admin:password -H 'content-type: application/json' \
//!   -d '{"message": "What is chlorophyll?", "mode": "explain"}' \
//!   http://127.0.0.1:3000/api/chat
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tutor_rs::prelude::*;
use tutor_web::{BasicAuth, WebConfig, spawn_web, wait_for_shutdown};

/// Study-notes tutor HTTP server.
#[derive(Parser)]
#[command(name = "tutor-web", about = "HTTP API for the study-notes tutor")]
struct Args {
    // ── Listener ───────────────────────────────────────────────
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Interface to bind.
    #[arg(long, env = "TUTOR_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Directory of frontend files served for non-API paths.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    static_dir: PathBuf,

    // ── Completion API ─────────────────────────────────────────
    /// API key for the completion service.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat-completions endpoint.
    #[arg(long, env = "OPENAI_API_URL", default_value = tutor_rs::DEFAULT_API_URL)]
    api_url: String,

    /// Model identifier.
    #[arg(long, env = "OPENAI_MODEL", default_value = tutor_rs::DEFAULT_MODEL)]
    model: String,

    /// Per-call timeout in seconds.
    #[arg(long, env = "TUTOR_TIMEOUT_SECS", default_value_t = 15)]
    timeout_secs: u64,

    /// Retries for transient completion failures (0 = single attempt).
    #[arg(long, env = "TUTOR_MAX_RETRIES", default_value_t = 0)]
    max_retries: u32,

    /// Keep only this many recent history turns in each prompt.
    #[arg(long, env = "TUTOR_MAX_HISTORY_TURNS")]
    max_history_turns: Option<usize>,

    // ── Authentication ─────────────────────────────────────────
    /// Basic-auth username.
    #[arg(long, env = "AUTH_USER", default_value = "admin")]
    auth_user: String,

    /// Basic-auth password.
    #[arg(long, env = "AUTH_PASS", default_value = "password", hide_env_values = true)]
    auth_pass: String,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Panics outside request handlers would otherwise only reach stderr
    // unformatted.
    std::panic::set_hook(Box::new(|info| {
        error!("Unhandled panic: {info}");
    }));
}

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing();

    // 1. Completion gateway, optionally wrapped in retries.
    let config = GatewayConfig::default()
        .with_api_key(args.api_key)
        .with_api_url(args.api_url)
        .with_model(args.model)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let gateway = config.build_gateway().map_err(|e| e.to_string())?;
    let configured = gateway.is_configured();
    let gateway = RetryingGateway::new(gateway, RetryConfig::with_retries(args.max_retries));

    // 2. Tutor shared by every request.
    let tutor = Arc::new(
        Tutor::new(Arc::new(gateway)).with_max_history_turns(args.max_history_turns),
    );

    // 3. Web server.
    let web_config = WebConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        static_dir: Some(args.static_dir),
        auth: Some(BasicAuth::new(args.auth_user, args.auth_pass)),
    };
    let (addr, server) = spawn_web(tutor, web_config)
        .await
        .map_err(|e| format!("Failed to bind {}:{}: {e}", args.host, args.port))?;

    info!("LLM Tutor API listening on http://{addr}");
    info!("Model: {} (timeout {}s)", config.model, args.timeout_secs);
    if configured {
        info!("OpenAI API key configured");
    } else {
        warn!("OPENAI_API_KEY not set; replies come from the demo fallback pool");
    }

    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| format!("Failed to listen for shutdown signal: {e}"))
    };
    wait_for_shutdown(server, ctrl_c).await?;
    info!("Shutting down");
    Ok(())
}
