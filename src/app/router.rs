use crate::app::state::AppState;
use crate::handler::health::health_handler;
use crate::handler::pages;
use axum::Router;
use axum::routing::get;

pub const MAIN_ENDPOINTS: [&str; 4] = ["/", "/services", "/contact", "/dashboard"];

pub const AUTH_ENDPOINTS: [&str; 5] = [
    "/login",
    "/signup",
    "/logout",
    "/forgot-password",
    "/reset-password",
];

pub const HEALTH_ENDPOINTS: [&str; 1] = ["/v1/health"];

/// A named set of routes registered on the application.
pub struct RouteGroup {
    pub name: &'static str,
    pub endpoints: &'static [&'static str],
    pub router: Router<AppState>,
}

/// Public marketing pages and the dashboard.
pub fn main_routes() -> RouteGroup {
    let router = Router::new()
        .route("/", get(pages::home))
        .route("/services", get(pages::services))
        .route("/contact", get(pages::contact))
        .route("/dashboard", get(pages::dashboard));

    RouteGroup {
        name: "main",
        endpoints: &MAIN_ENDPOINTS,
        router,
    }
}

/// Account pages.
pub fn auth_routes() -> RouteGroup {
    let router = Router::new()
        .route("/login", get(pages::login))
        .route("/signup", get(pages::signup))
        .route("/logout", get(pages::logout))
        .route("/forgot-password", get(pages::forgot_password))
        .route("/reset-password", get(pages::reset_password));

    RouteGroup {
        name: "auth",
        endpoints: &AUTH_ENDPOINTS,
        router,
    }
}

pub fn health_routes() -> RouteGroup {
    RouteGroup {
        name: "health",
        endpoints: &HEALTH_ENDPOINTS,
        router: Router::new().route("/v1/health", get(health_handler)),
    }
}
