//! otelnote server
//!
//! - Note CRUD: POST /note, GET|PUT|DELETE /note/:id
//! - One counter per verb, pushed over OTLP/gRPC on a fixed interval
//! - /healthz and /metrics for local inspection

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use otelnote_core::error::{NoteError, Result};
use otelnote_server::{app_state::AppState, config, obs, router, store};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "otelnote-server exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = config::load()?;
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .map_err(|e| NoteError::Internal(format!("server.listen: {e}")))?;

    let metrics = Arc::new(obs::NoteMetrics::new());
    let telemetry = obs::otel::init(&cfg.telemetry, Arc::clone(&metrics))?;
    let note_store = store::build(&cfg.storage)?;

    let state = AppState::new(&cfg, note_store, metrics);
    let app = router::build_router(state);

    tracing::info!(%listen, "otelnote-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| NoteError::Internal(format!("bind {listen} failed: {e}")))?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| NoteError::Internal(format!("server failed: {e}")));

    // Flush whatever the last interval has not pushed yet. The SDK blocks
    // on its reader task here, so keep it off the async workers.
    if let Err(e) = tokio::task::spawn_blocking(move || telemetry.shutdown()).await {
        tracing::warn!(error = %e, "telemetry shutdown task failed");
    }
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
