use std::net::SocketAddr;

use kube_ops_todo::{Settings, StartupError, TelemetryGuard};

use thiserror::Error;
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::signal;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

#[derive(Debug, Error)]
enum TodoAppError {
    #[error("Startup error")]
    Startup(#[from] StartupError),

    #[error("Io error")]
    Io(#[from] std::io::Error),
}

fn main() -> Result<(), TodoAppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .max_blocking_threads(num_cpus::get() * 2)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

#[cfg(unix)]
async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "failed to bind to SIGTERM, waiting for SIGINT only");
            let _ = signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM received.");
        },
    }
}

async fn async_main() -> Result<(), TodoAppError> {
    let settings = Settings::new()?;

    let _telemetry = TelemetryGuard::init(&settings)?;

    let server_addr = settings.server_addr();
    let (app, service) = kube_ops_todo::init_app(settings)?;

    let listener = TcpListener::bind(&server_addr).await?;
    info!(%server_addr, "listening");

    let shutdown_signal = async {
        #[cfg(unix)]
        shutdown_signal().await;
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    if let Err(e) = service.flush_storage().await {
        warn!(error = ?e, "failed to flush storage on shutdown");
    }

    Ok(())
}
