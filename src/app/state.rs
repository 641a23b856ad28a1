use crate::config::Settings;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state handed to every page handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub templates_dir: PathBuf,
}

impl AppState {
    /// Create `AppState` from configuration settings.
    #[must_use]
    pub fn from_settings(settings: Arc<Settings>) -> Self {
        let templates_dir = settings.templates_dir();
        Self {
            settings,
            templates_dir,
        }
    }
}
