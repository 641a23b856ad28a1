use crate::app::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::{error, warn};

/// Serve `templates/<name>` as an HTML page.
pub async fn render_page(state: &AppState, name: &str) -> Response {
    let path = state.templates_dir.join(name);
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!("Failed to read template {}: {e}", path.display());
            render_error(state, StatusCode::INTERNAL_SERVER_ERROR).await
        }
    }
}

/// Serve `templates/errors/<code>.html`, or a plain reason phrase when the
/// error template itself is unavailable.
pub async fn render_error(state: &AppState, status: StatusCode) -> Response {
    let path = state
        .templates_dir
        .join("errors")
        .join(format!("{}.html", status.as_u16()));
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            warn!("Error template {} unavailable: {e}", path.display());
            let reason = status.canonical_reason().unwrap_or("Error");
            (status, reason).into_response()
        }
    }
}

pub async fn not_found(State(state): State<AppState>) -> Response {
    render_error(&state, StatusCode::NOT_FOUND).await
}

pub async fn home(State(state): State<AppState>) -> Response {
    render_page(&state, "home.html").await
}

pub async fn services(State(state): State<AppState>) -> Response {
    render_page(&state, "services.html").await
}

pub async fn contact(State(state): State<AppState>) -> Response {
    render_page(&state, "contact.html").await
}

pub async fn dashboard(State(state): State<AppState>) -> Response {
    render_page(&state, "dashboard.html").await
}

pub async fn login(State(state): State<AppState>) -> Response {
    render_page(&state, "login.html").await
}

pub async fn signup(State(state): State<AppState>) -> Response {
    render_page(&state, "signup.html").await
}

pub async fn logout() -> Redirect {
    Redirect::to("/")
}

pub async fn forgot_password(State(state): State<AppState>) -> Response {
    render_page(&state, "forgot_password.html").await
}

pub async fn reset_password(State(state): State<AppState>) -> Response {
    render_page(&state, "reset_password.html").await
}
