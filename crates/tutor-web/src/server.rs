//! Axum server setup and router construction.

use std::any::Any;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tokio::task::JoinHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};
use tutor_rs::tutor::Tutor;

use crate::api::{self, AppState};
use crate::auth::{self, BasicAuth};

/// Build the full axum router.
///
/// The router serves:
/// - REST API at `/api/*`
/// - Optional static files for everything else
///
/// Layers, outermost first: request tracing, CORS, panic-to-500, Basic auth.
pub fn build_router(
    tutor: Arc<Tutor>,
    auth: Option<BasicAuth>,
    static_dir: Option<PathBuf>,
) -> Router {
    let app_state = AppState { tutor };

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let mut router = Router::new()
        .route("/api/health", get(api::get_health))
        .route("/api/chat", post(api::post_chat))
        .with_state(app_state);

    match static_dir {
        Some(dir) if dir.is_dir() => {
            router = router.fallback_service(ServeDir::new(dir));
        }
        Some(dir) => warn!("Static directory {} not found, not serving files", dir.display()),
        None => {}
    }

    if let Some(auth) = auth {
        router = router.layer(middleware::from_fn_with_state(
            Arc::new(auth),
            auth::require_basic_auth,
        ));
    }

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Turn a handler panic into a 500 with the panic message as details.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Error in request handler: {details}");
    api::internal_error(details).into_response()
}

/// Handle to the background serve task. Resolves only if serving stops.
pub type ServerHandle = JoinHandle<std::io::Result<()>>;

/// Bind the listener, start serving on a background task, and return the
/// bound address with the task handle.
pub async fn start_server(
    router: Router,
    bind_addr: SocketAddr,
) -> std::io::Result<(SocketAddr, ServerHandle)> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .inspect_err(|e| error!("Server error: {e}"))
    });

    Ok((addr, handle))
}

/// Wait until `shutdown` completes or the server stops on its own.
///
/// A server that stops before shutdown was requested is an error: the
/// process would otherwise keep running without a listener.
pub async fn wait_for_shutdown<F>(server: ServerHandle, shutdown: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    tokio::select! {
        requested = shutdown => requested,
        joined = server => match joined {
            Ok(Ok(())) => Err("server stopped unexpectedly".to_string()),
            Ok(Err(e)) => Err(format!("server error: {e}")),
            Err(e) => Err(format!("server task failed: {e}")),
        },
    }
}
