use crate::error::AppError;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Serve `app` on `0.0.0.0:<http_port>` until SIGINT/SIGTERM or until
/// `shutdown_token` is cancelled.
pub async fn serve(
    app: Router,
    http_port: u16,
    shutdown_token: CancellationToken,
) -> Result<(), AppError> {
    let address = format!("0.0.0.0:{http_port}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| AppError::Bind { address, source })?;
    serve_on(listener, app, shutdown_token).await
}

/// Serve on an already bound listener.
pub async fn serve_on(
    listener: TcpListener,
    app: Router,
    shutdown_token: CancellationToken,
) -> Result<(), AppError> {
    info!("EcoReborn listening on http://{}", listener.local_addr()?);

    let token = shutdown_token.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                signal = shutdown_signal() => {
                    info!("Received {signal}, shutting down");
                    token.cancel();
                }
                () = shutdown_token.cancelled_owned() => info!("Shutdown requested"),
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves with the name of the first termination signal received.
async fn shutdown_signal() -> &'static str {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!("Cannot listen for Ctrl+C: {e}");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {e}");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}
