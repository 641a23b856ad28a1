//! Serverless-style entry point.
//!
//! Always serves something: when the application cannot be built, a single
//! JSON endpoint at `/` reports why.

use ecoreborn::app::server::serve;
use ecoreborn::app::tracing::init_tracing;
use ecoreborn::config::{Environment, Settings, load_dotenv};
use ecoreborn::error::AppError;
use ecoreborn::healthcheck::healthcheck_port;
use ecoreborn::shim;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(Level::INFO);

    let search_path = shim::search_path();
    let root = shim::find_project_root(&search_path)
        .or_else(|| search_path.first().cloned())
        .unwrap_or_default();
    info!("Project root: {}", root.display());

    let router = shim::serverless_app(
        || -> Result<_, AppError> {
            load_dotenv(&root);
            let settings = Settings::from_env(&Environment::capture(), &root)?;
            shim::application(settings)
        },
        &search_path,
    );

    let port = healthcheck_port();
    serve(router, port, CancellationToken::new()).await?;
    Ok(())
}
