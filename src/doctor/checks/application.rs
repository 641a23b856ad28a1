use crate::app::create_app;
use crate::config::Settings;
use crate::doctor::report::{Detail, Mark};
use crate::doctor::{Check, CheckContext, CheckFuture, CheckOutcome};
use crate::error::AppError;
use std::error::Error as _;

pub struct ApplicationCheck;

impl Check for ApplicationCheck {
    fn name(&self) -> &'static str {
        "Application"
    }

    fn title(&self) -> &'static str {
        "APPLICATION CHECK"
    }

    fn run<'a>(&'a self, ctx: &'a CheckContext) -> CheckFuture<'a> {
        Box::pin(async move { check_application(ctx) })
    }
}

fn set_or_not(value: &str) -> &'static str {
    if value.is_empty() { "NOT SET" } else { "Set" }
}

fn check_application(ctx: &CheckContext) -> CheckOutcome {
    let mut detail = Detail::default();

    let built = Settings::from_env(&ctx.env, &ctx.root)
        .map_err(AppError::from)
        .and_then(create_app);

    let creating = detail.block("Creating Application:");
    let app = match built {
        Ok(app) => {
            creating.pass("Application created successfully");
            app
        }
        Err(e) => {
            creating.fail(format!("Application creation failed: {e}"));
            let mut source = e.source();
            while let Some(cause) = source {
                creating.nested(Mark::Note, format!("caused by: {cause}"));
                source = cause.source();
            }
            return CheckOutcome::new(false, detail);
        }
    };

    let settings = &app.settings;
    detail
        .block("Application Configuration:")
        .pass(format!("Secret Key: {}", set_or_not(&settings.secret_key)))
        .pass(format!("MongoDB URI: {}", set_or_not(&settings.mongodb_uri)))
        .pass(format!("Database Name: {}", settings.mongodb_db_name))
        .pass(format!("Environment: {}", settings.app_env))
        .pass(format!("App URL: {}", settings.app_url));

    let extensions = detail.block("Extensions:");
    for extension in &app.extensions {
        extensions.pass(*extension);
    }

    let groups = detail.block("Registered Route Groups:");
    for group in &app.route_groups {
        groups.pass(*group);
    }

    CheckOutcome::new(true, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::test_support::MemoryConnector;
    use std::sync::Arc;

    fn context(env: Environment) -> CheckContext {
        CheckContext {
            env,
            root: ".".into(),
            connector: Arc::new(MemoryConnector::unreachable("unused")),
        }
    }

    #[test]
    fn test_application_echoes_configuration() {
        let env = Environment::from_pairs([
            ("SECRET_KEY", "test-secret"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("MONGODB_DB_NAME", "ecoreborn_test"),
            ("APP_ENV", "development"),
        ]);
        let outcome = check_application(&context(env));
        assert!(outcome.passed);
        let detail = &outcome.detail;
        assert_eq!(detail.find(Mark::Pass, "Secret Key: Set").count(), 1);
        assert_eq!(detail.find(Mark::Pass, "Database Name: ecoreborn_test").count(), 1);
        assert_eq!(detail.find(Mark::Pass, "Environment: development").count(), 1);
        for group in ["main", "auth", "health"] {
            assert!(detail.lines().any(|l| l.text == group), "{group} missing");
        }
    }

    #[test]
    fn test_application_failure_reports_cause() {
        let env = Environment::from_pairs([("SECRET_KEY", "test-secret")]);
        let outcome = check_application(&context(env));
        assert!(!outcome.passed);
        let line = outcome
            .detail
            .find(Mark::Fail, "Application creation failed")
            .next()
            .unwrap();
        assert!(line.text.contains("MONGODB_URI"));
        assert_eq!(outcome.detail.find(Mark::Note, "caused by:").count(), 1);
    }
}
