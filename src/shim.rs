//! Deployment entry points.
//!
//! [`application`] is the strict entry used by `ecoreborn serve`: any error
//! building the app propagates. [`serverless_app`] is used by platforms that
//! need some app to mount no matter what: when loading fails it serves a
//! single diagnostic endpoint instead.

use crate::app::{Application, create_app};
use crate::config::Settings;
use crate::doctor::panic_message;
use crate::error::AppError;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::error;

pub fn application(settings: Settings) -> Result<Application, AppError> {
    create_app(settings)
}

/// Run `loader` and return its router, or [`fallback_app`] when it errors or panics.
pub fn serverless_app<F, E>(loader: F, search_path: &[PathBuf]) -> Router
where
    F: FnOnce() -> Result<Application, E>,
    E: Display,
{
    let message = match panic::catch_unwind(AssertUnwindSafe(loader)) {
        Ok(Ok(app)) => return app.into_router(),
        Ok(Err(e)) => e.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };
    error!(message = %message, "Failed to load application; serving fallback");
    fallback_app(message, search_path)
}

/// A router answering `GET /` with 500 and a JSON description of the load failure.
pub fn fallback_app(message: impl Into<String>, search_path: &[PathBuf]) -> Router {
    let body: Value = json!({
        "error": "Failed to import app",
        "message": message.into(),
        "path": search_path
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>(),
    });
    Router::new().route(
        "/",
        get(move || {
            let body = body.clone();
            async move { (StatusCode::INTERNAL_SERVER_ERROR, Json(body)) }
        }),
    )
}

/// Directories searched for the project root, in priority order: the working
/// directory, then the executable's directory and its parent.
#[must_use]
pub fn search_path() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        let parent = exe_dir.parent().map(Path::to_path_buf);
        dirs.push(exe_dir);
        dirs.extend(parent);
    }
    dirs.dedup();
    dirs
}

/// First directory in `search_path` that contains `templates/`.
#[must_use]
pub fn find_project_root(search_path: &[PathBuf]) -> Option<PathBuf> {
    search_path
        .iter()
        .find(|dir| dir.join("templates").is_dir())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use axum_test::TestServer;

    fn settings(root: &Path) -> Settings {
        let env = Environment::from_pairs([
            ("SECRET_KEY", "test-secret"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
        ]);
        Settings::from_env(&env, root).unwrap()
    }

    #[tokio::test]
    async fn test_fallback_serves_json_error() {
        let search = vec![PathBuf::from("/srv/app"), PathBuf::from("/srv")];
        let server = TestServer::new(fallback_app("boom", &search)).unwrap();

        let response = server.get("/").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["error"], "Failed to import app");
        assert_eq!(body["message"], "boom");
        assert_eq!(body["path"], json!(["/srv/app", "/srv"]));
    }

    #[tokio::test]
    async fn test_fallback_has_no_other_routes() {
        let server = TestServer::new(fallback_app("boom", &[])).unwrap();
        server.get("/login").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_serverless_app_falls_back_on_error() {
        let router = serverless_app(
            || Err::<Application, _>("Missing required environment variable: SECRET_KEY"),
            &[],
        );
        let server = TestServer::new(router).unwrap();

        let body: Value = server.get("/").await.json();

        assert_eq!(body["message"], "Missing required environment variable: SECRET_KEY");
    }

    #[tokio::test]
    async fn test_serverless_app_falls_back_on_panic() {
        fn exploding() -> Result<Application, AppError> {
            panic!("loader exploded")
        }
        let server = TestServer::new(serverless_app(exploding, &[])).unwrap();

        let response = server.get("/").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "loader exploded");
    }

    #[tokio::test]
    async fn test_serverless_app_serves_loaded_app() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let router = serverless_app(|| application(settings(&root)), &[]);
        let server = TestServer::new(router).unwrap();

        let response = server.get("/v1/health").await;

        response.assert_status_ok();
        response.assert_text("Healthy");
    }

    #[test]
    fn test_find_project_root_picks_first_with_templates() {
        let empty = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        std::fs::create_dir(project.path().join("templates")).unwrap();
        let search = vec![empty.path().to_path_buf(), project.path().to_path_buf()];

        assert_eq!(find_project_root(&search), Some(project.path().to_path_buf()));
        assert_eq!(find_project_root(&search[..1]), None);
    }
}
