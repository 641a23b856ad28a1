//! Container healthcheck probe (`ecoreborn healthcheck`).
//!
//! Distroless images ship no curl, so the binary checks itself.

use crate::config::DEFAULT_HTTP_PORT;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Healthcheck failed: {0}")]
pub struct HealthcheckError(String);

/// Port from `PORT`, falling back to the default HTTP port.
#[must_use]
pub fn healthcheck_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_HTTP_PORT)
}

/// Perform a health check against the configured port.
pub async fn healthcheck() -> Result<(), HealthcheckError> {
    healthcheck_with_port(healthcheck_port()).await
}

/// Perform a health check against a specific port.
pub async fn healthcheck_with_port(port: u16) -> Result<(), HealthcheckError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .map_err(|e| HealthcheckError(format!("Failed to create HTTP client: {e}")))?;

    let url = format!("http://127.0.0.1:{port}/v1/health");

    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| HealthcheckError(format!("Request failed: {e}")))?;

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(HealthcheckError(format!(
            "Health endpoint returned status: {}",
            resp.status()
        )))
    }
}
