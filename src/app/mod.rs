pub mod router;
pub mod server;
pub mod state;
pub mod tracing;

use crate::config::Settings;
use crate::error::AppError;
use crate::handler::pages;
use axum::Router;
use router::RouteGroup;
use state::AppState;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Extensions layered onto every application, in registration order.
pub const EXTENSIONS: [&str; 3] = [
    "Request tracing",
    "Static files (/static)",
    "Not-found fallback",
];

/// A fully constructed application: its router plus what was registered on it.
pub struct Application {
    pub settings: Arc<Settings>,
    /// Names of the registered route groups, in registration order.
    pub route_groups: Vec<&'static str>,
    pub extensions: Vec<&'static str>,
    router: Router,
}

impl Application {
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Application factory.
///
/// Validates `settings` and wires the `main`, `auth` and `health` route
/// groups, static file serving under `/static`, the 404 fallback and request
/// tracing. Does not open a database connection.
pub fn create_app(settings: Settings) -> Result<Application, AppError> {
    settings.validate()?;

    if !settings.templates_dir().is_dir() {
        ::tracing::warn!(
            "Templates directory {} not found; pages will answer 500",
            settings.templates_dir().display()
        );
    }

    let settings = Arc::new(settings);
    let state = AppState::from_settings(settings.clone());

    let groups: [RouteGroup; 3] = [
        router::main_routes(),
        router::auth_routes(),
        router::health_routes(),
    ];
    let route_groups = groups.iter().map(|g| g.name).collect();

    let router = groups
        .into_iter()
        .fold(Router::new(), |acc, group| acc.merge(group.router))
        .nest_service("/static", ServeDir::new(settings.static_dir()))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(Application {
        settings,
        route_groups,
        extensions: EXTENSIONS.to_vec(),
        router,
    })
}

/// Serve `app` until SIGINT/SIGTERM.
pub async fn run(app: Application) -> Result<(), AppError> {
    let port = app.settings.http_port;
    ::tracing::info!(
        environment = %app.settings.app_env,
        url = %app.settings.app_url,
        "Starting EcoReborn"
    );
    server::serve(app.into_router(), port, CancellationToken::new()).await
}
