use std::future::Future;

use axum::Router;
use configs::AppConfig;
use service::storage::Storage;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router over an already opened storage backend.
pub fn build_app(storage: Storage) -> Router {
    routes::build_router(AppState::new(storage), build_cors())
}

/// Public entry: load configuration, then serve until ctrl-c.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate()?;
    run_with_config(cfg).await
}

pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let storage = Storage::connect(&cfg.database).await?;
    let app = build_app(storage);

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "pet shop server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c())).await?;
    info!("server stopped");
    Ok(())
}

/// Completes once `signal` fires; if it cannot be listened for, never completes.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("shutdown signal received, draining connections"),
        Err(e) => {
            // 无法监听信号时保持运行，而不是立即停机
            error!(error = %e, "cannot listen for ctrl-c; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn signal_listener_error_keeps_server_running() {
        let failing = async { Err::<(), _>(std::io::Error::other("no signal handler")) };
        let res = tokio::time::timeout(Duration::from_millis(50), shutdown_on(failing)).await;
        assert!(res.is_err(), "shutdown must not trigger when the listener fails");
    }

    #[tokio::test]
    async fn signal_completes_shutdown() {
        let res = tokio::time::timeout(Duration::from_millis(50), shutdown_on(async { Ok::<(), std::io::Error>(()) })).await;
        assert!(res.is_ok());
    }
}
