pub mod application;
pub mod database;
pub mod dependencies;
pub mod environment;
pub mod files;
pub mod forms;
pub mod models;
pub mod routes;

use super::Check;

/// Every check, in the order the report runs them.
#[must_use]
pub fn standard() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(environment::EnvironmentCheck),
        Box::new(database::DatabaseCheck),
        Box::new(models::ModelsCheck),
        Box::new(forms::FormsCheck),
        Box::new(routes::RoutesCheck),
        Box::new(application::ApplicationCheck),
        Box::new(files::StaticFilesCheck),
        Box::new(files::TemplatesCheck),
        Box::new(dependencies::DependenciesCheck),
    ]
}
