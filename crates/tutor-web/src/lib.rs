//! HTTP API for the study-notes tutor.
//!
//! `tutor-web` wraps a [`Tutor`] in an axum server with two endpoints:
//!
//! - `GET /api/health`: liveness probe, no authentication.
//! - `POST /api/chat`: `{message, mode, history?, topic?, language?}` →
//!   `{reply}`. Malformed requests get a 400 with `{error}`.
//!
//! Every other path sits behind HTTP Basic authentication. When a static
//! directory is configured and exists, it is served as the fallback route.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tutor_rs::prelude::*;
//! use tutor_web::{WebConfig, spawn_web};
//!
//! let gateway = GatewayConfig::default().build_gateway()?;
//! let tutor = Arc::new(Tutor::new(Arc::new(gateway)));
//!
//! let (addr, server) = spawn_web(tutor, WebConfig::default()).await?;
//! println!("Tutor API: http://{addr}");
//! ```

mod api;
pub mod auth;
mod server;

pub use api::{ChatResponse, ErrorResponse, HealthResponse};
pub use auth::BasicAuth;
pub use server::{ServerHandle, build_router, start_server, wait_for_shutdown};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tutor_rs::tutor::Tutor;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3000`.
    pub bind_addr: SocketAddr,
    /// Directory of frontend files served for non-API paths. Ignored if it
    /// does not exist.
    pub static_dir: Option<PathBuf>,
    /// Credentials required on every route except the health check. `None`
    /// disables authentication.
    pub auth: Option<BasicAuth>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: None,
            auth: None,
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address with
/// the serve task's handle.
///
/// The server runs until the Tokio runtime shuts down; dropping the handle
/// does not stop it. Binding to port 0 picks a free port.
pub async fn spawn_web(
    tutor: Arc<Tutor>,
    config: WebConfig,
) -> std::io::Result<(SocketAddr, ServerHandle)> {
    let router = build_router(tutor, config.auth, config.static_dir);
    start_server(router, config.bind_addr).await
}
