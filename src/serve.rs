use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    config::BuildConfig,
    foundation::error::{RadarError, RadarResult},
    pipeline::{BuildOutput, build_animation},
    source::dir::DirSource,
    source::staging::{DirStagingSink, NullStaging},
};

/// Address the server binds when none is given.
pub const DEFAULT_SERVE_ADDR: &str = "0.0.0.0:9099";
/// How long in-flight requests may take to drain after a shutdown signal.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Everything one request needs to build a loop from scratch.
#[derive(Clone, Debug)]
pub struct ServeConfig {
    /// Root of the local archive mirror.
    pub root: PathBuf,
    pub build: BuildConfig,
}

/// `GET /` builds one radar loop per request and answers with the GIF.
pub fn router(cfg: ServeConfig) -> Router {
    Router::new()
        .route("/", get(radar_loop))
        .with_state(Arc::new(cfg))
}

async fn radar_loop(State(cfg): State<Arc<ServeConfig>>) -> Response {
    let built = tokio::task::spawn_blocking(move || build_once(&cfg)).await;
    match built {
        Ok(Ok(out)) => {
            tracing::info!(
                frames = out.sweeps.len(),
                bytes = out.gif.len(),
                "served radar loop"
            );
            ([(header::CONTENT_TYPE, "image/gif")], out.gif).into_response()
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "radar loop build failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "radar loop build task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn build_once(cfg: &ServeConfig) -> RadarResult<BuildOutput> {
    let mut source = DirSource::new(&cfg.root);
    match &cfg.build.staging_dir {
        Some(dir) if cfg.build.stage_intermediates => {
            let mut staging = DirStagingSink::new(dir);
            build_animation(&cfg.build, &mut source, &mut staging)
        }
        _ => build_animation(&cfg.build, &mut source, &mut NullStaging),
    }
}

/// Serve radar loops on `listener` until `shutdown` resolves.
///
/// After `shutdown` the server stops accepting and waits up to [`SHUTDOWN_GRACE`] for
/// in-flight requests.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    cfg: ServeConfig,
    shutdown: F,
) -> RadarResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("read listener address")?;
    tracing::info!(%addr, root = %cfg.root.display(), "serving radar loops");

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router(cfg))
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        res = &mut server => return server_result(res),
        () = shutdown => {}
    }

    tracing::info!("shutdown requested, draining http server");
    let _ = stop_tx.send(());
    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(res) => {
            server_result(res)?;
            tracing::info!("http server shut down gracefully");
            Ok(())
        }
        Err(_) => Err(RadarError::Other(anyhow::anyhow!(
            "http server did not drain within {}s",
            SHUTDOWN_GRACE.as_secs()
        ))),
    }
}

fn server_result(res: Result<std::io::Result<()>, tokio::task::JoinError>) -> RadarResult<()> {
    res.context("http server task")?.context("http server")?;
    Ok(())
}

/// Resolve on SIGINT (Ctrl-C) or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!(signal = "SIGINT", "received shutdown signal"),
        () = terminate => tracing::info!(signal = "SIGTERM", "received shutdown signal"),
    }
}

#[cfg(test)]
#[path = "../tests/unit/serve.rs"]
mod tests;
