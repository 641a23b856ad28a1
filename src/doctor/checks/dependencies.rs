//! Smoke probes for the libraries the service links against.
//!
//! Linking already proves the crates are present, so each probe exercises
//! one real operation instead.

use crate::config::DEFAULT_APP_URL;
use crate::doctor::panic_message;
use crate::doctor::report::Detail;
use crate::doctor::{Check, CheckContext, CheckFuture, CheckOutcome};
use crate::domain::models::NewsletterSubscriber;
use mongodb::bson::{self, DateTime};
use std::panic::{self, AssertUnwindSafe};

pub type Probe = fn() -> Result<(), String>;

pub struct Dependency {
    pub name: &'static str,
    pub description: &'static str,
    pub probe: Probe,
}

pub const DEPENDENCIES: [Dependency; 9] = [
    Dependency {
        name: "tokio",
        description: "Async runtime",
        probe: probe_tokio,
    },
    Dependency {
        name: "axum",
        description: "Web framework",
        probe: probe_axum,
    },
    Dependency {
        name: "tower-http",
        description: "HTTP middleware and static files",
        probe: probe_tower_http,
    },
    Dependency {
        name: "mongodb",
        description: "MongoDB driver and BSON",
        probe: probe_mongodb,
    },
    Dependency {
        name: "serde_json",
        description: "JSON serialization",
        probe: probe_serde_json,
    },
    Dependency {
        name: "bcrypt",
        description: "Password hashing",
        probe: probe_bcrypt,
    },
    Dependency {
        name: "url",
        description: "URL parsing",
        probe: probe_url,
    },
    Dependency {
        name: "chrono",
        description: "Date and time",
        probe: probe_chrono,
    },
    Dependency {
        name: "dotenvy",
        description: "Environment file loading",
        probe: probe_dotenvy,
    },
];

fn probe_tokio() -> Result<(), String> {
    tokio::runtime::Handle::try_current()
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn probe_axum() -> Result<(), String> {
    let _router: axum::Router = axum::Router::new().route("/", axum::routing::get(|| async { "ok" }));
    Ok(())
}

fn probe_tower_http() -> Result<(), String> {
    let _serve = tower_http::services::ServeDir::new("static");
    Ok(())
}

fn probe_mongodb() -> Result<(), String> {
    let subscriber = NewsletterSubscriber {
        id: None,
        email: "probe@example.com".to_string(),
        subscribed_at: DateTime::now(),
        active: true,
    };
    let document = bson::to_document(&subscriber).map_err(|e| e.to_string())?;
    let decoded: NewsletterSubscriber = bson::from_document(document).map_err(|e| e.to_string())?;
    if decoded.email == subscriber.email {
        Ok(())
    } else {
        Err("BSON round trip changed the document".to_string())
    }
}

fn probe_serde_json() -> Result<(), String> {
    let value: serde_json::Value = serde_json::from_str(r#"{"status":"ok"}"#).map_err(|e| e.to_string())?;
    match value["status"].as_str() {
        Some("ok") => Ok(()),
        _ => Err("unexpected JSON value".to_string()),
    }
}

fn probe_bcrypt() -> Result<(), String> {
    let hash = bcrypt::hash("probe", 4).map_err(|e| e.to_string())?;
    match bcrypt::verify("probe", &hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err("hash did not verify".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn probe_url() -> Result<(), String> {
    url::Url::parse(DEFAULT_APP_URL)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn probe_chrono() -> Result<(), String> {
    let stamp = chrono::Utc::now().to_rfc3339();
    chrono::DateTime::parse_from_rfc3339(&stamp)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn probe_dotenvy() -> Result<(), String> {
    let mut pairs = dotenvy::from_read_iter(&b"PROBE=1"[..]);
    match pairs.next() {
        Some(Ok((key, value))) if key == "PROBE" && value == "1" => Ok(()),
        Some(Err(e)) => Err(e.to_string()),
        _ => Err("unexpected parse result".to_string()),
    }
}

pub struct DependenciesCheck;

impl Check for DependenciesCheck {
    fn name(&self) -> &'static str {
        "Dependencies"
    }

    fn title(&self) -> &'static str {
        "DEPENDENCIES CHECK"
    }

    fn run<'a>(&'a self, _ctx: &'a CheckContext) -> CheckFuture<'a> {
        Box::pin(async move { check_dependencies(&DEPENDENCIES) })
    }
}

fn check_dependencies(dependencies: &[Dependency]) -> CheckOutcome {
    let mut detail = Detail::default();
    let mut all_ok = true;

    let block = detail.block("Required Libraries:");
    for dependency in dependencies {
        let result = panic::catch_unwind(AssertUnwindSafe(dependency.probe))
            .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())));
        match result {
            Ok(()) => {
                block.pass(format!("{} - {}", dependency.name, dependency.description));
            }
            Err(reason) => {
                block.fail(format!(
                    "{} - NOT AVAILABLE - {}: {reason}",
                    dependency.name, dependency.description
                ));
                all_ok = false;
            }
        }
    }

    CheckOutcome::new(all_ok, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctor::report::Mark;

    #[tokio::test]
    async fn test_linked_dependencies_pass() {
        let outcome = check_dependencies(&DEPENDENCIES);
        assert!(outcome.passed, "{:?}", outcome.detail);
        assert_eq!(outcome.detail.find(Mark::Pass, " - ").count(), 9);
    }

    #[test]
    fn test_failing_probe_fails_and_others_still_run() {
        fn broken() -> Result<(), String> {
            Err("not linked".to_string())
        }
        fn exploding() -> Result<(), String> {
            panic!("probe blew up")
        }
        let deps = [
            Dependency {
                name: "broken",
                description: "Broken",
                probe: broken,
            },
            Dependency {
                name: "exploding",
                description: "Exploding",
                probe: exploding,
            },
            Dependency {
                name: "url",
                description: "URL parsing",
                probe: probe_url,
            },
        ];

        let outcome = check_dependencies(&deps);

        assert!(!outcome.passed);
        assert_eq!(outcome.detail.find(Mark::Fail, "not linked").count(), 1);
        assert_eq!(outcome.detail.find(Mark::Fail, "probe blew up").count(), 1);
        assert_eq!(outcome.detail.find(Mark::Pass, "url").count(), 1);
    }

    #[test]
    fn test_tokio_probe_needs_a_runtime() {
        assert!(probe_tokio().is_err());
    }
}
