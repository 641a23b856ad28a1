use tracing::debug;

/// Liveness endpoint; never touches the database.
pub async fn health_handler() -> &'static str {
    debug!("Health check requested");
    "Healthy"
}
