//! Project self-check.
//!
//! Runs a fixed sequence of independent checks, prints one report section per
//! check as it finishes, and folds the outcomes into an ordered
//! `name -> passed` map. The run passes only when every entry is `true`.
//!
//! Checks are fault-isolated: a panic inside one is recorded as a failure of
//! that check and the run moves on.

pub mod checks;
pub mod report;

use crate::config::{DEFAULT_APP_URL, Environment};
use crate::port::Connector;
use futures::FutureExt;
use indexmap::IndexMap;
use report::{Detail, write_detail, write_section_header};
use std::any::Any;
use std::future::Future;
use std::io::{self, Write};
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{error, info};

/// Inputs shared by every check during one run.
pub struct CheckContext {
    pub env: Environment,
    /// Project root holding `templates/`, `static/` and the config files.
    pub root: PathBuf,
    pub connector: Arc<dyn Connector>,
}

#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    pub passed: bool,
    pub detail: Detail,
}

impl CheckOutcome {
    #[must_use]
    pub fn new(passed: bool, detail: Detail) -> Self {
        Self { passed, detail }
    }
}

pub type CheckFuture<'a> = Pin<Box<dyn Future<Output = CheckOutcome> + Send + 'a>>;

pub trait Check: Send + Sync {
    /// Component name used as the result key and in the summary.
    fn name(&self) -> &'static str;

    /// Section heading.
    fn title(&self) -> &'static str;

    fn run<'a>(&'a self, ctx: &'a CheckContext) -> CheckFuture<'a>;
}

/// Result of a full run.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Outcome per check, in run order.
    pub results: IndexMap<&'static str, bool>,
    pub details: IndexMap<&'static str, Detail>,
}

impl DoctorReport {
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.values().filter(|passed| **passed).count()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.values().all(|passed| *passed)
    }

    /// Process exit code: 0 when every check passed, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.all_passed())
    }
}

pub struct Doctor {
    checks: Vec<Box<dyn Check>>,
}

impl Default for Doctor {
    fn default() -> Self {
        Self::standard()
    }
}

impl Doctor {
    /// The standard checks in their fixed order.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_checks(checks::standard())
    }

    #[must_use]
    pub fn with_checks(checks: Vec<Box<dyn Check>>) -> Self {
        Self { checks }
    }

    #[must_use]
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run every check in order, writing the report to `out`.
    pub async fn run(&self, ctx: &CheckContext, out: &mut dyn Write) -> io::Result<DoctorReport> {
        write_banner(out)?;

        let mut report = DoctorReport::default();
        for (index, check) in self.checks.iter().enumerate() {
            let outcome = run_isolated(check.as_ref(), ctx).await;
            info!(check = check.name(), passed = outcome.passed, "Check finished");

            write_section_header(out, &format!("{}. {}", index + 1, check.title()))?;
            write_detail(out, &outcome.detail)?;

            report.results.insert(check.name(), outcome.passed);
            report.details.insert(check.name(), outcome.detail);
        }

        let files = checks::files::config_files_report(&ctx.root);
        write_section_header(
            out,
            &format!("{}. CONFIGURATION FILES CHECK", self.checks.len() + 1),
        )?;
        write_detail(out, &files)?;

        let app_url = ctx.env.get("APP_URL").unwrap_or(DEFAULT_APP_URL);
        write_summary(out, &report, app_url)?;
        Ok(report)
    }
}

async fn run_isolated(check: &dyn Check, ctx: &CheckContext) -> CheckOutcome {
    match AssertUnwindSafe(check.run(ctx)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(check = check.name(), message = %message, "Check panicked");
            let mut detail = Detail::default();
            detail
                .block("Unexpected Error:")
                .fail(format!("{} check panicked: {message}", check.name()));
            CheckOutcome::new(false, detail)
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

fn write_banner(out: &mut dyn Write) -> io::Result<()> {
    let rule = "=".repeat(70);
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, " ECOREBORN PROJECT HEALTH CHECK")?;
    writeln!(out, " {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "{rule}")
}

fn write_summary(out: &mut dyn Write, report: &DoctorReport, app_url: &str) -> io::Result<()> {
    write_section_header(out, "HEALTH CHECK SUMMARY")?;

    report::write_block_title(out, "Results:")?;
    for (component, passed) in &report.results {
        if *passed {
            writeln!(out, "✅ {component}: PASS")?;
        } else {
            writeln!(out, "❌ {component}: FAIL")?;
        }
    }

    report::write_block_title(out, "Overall Status:")?;
    let (passed, total) = (report.passed(), report.total());
    if report.all_passed() {
        writeln!(out, "\n✅ ALL CHECKS PASSED ({passed}/{total})")?;
        writeln!(out, "\nYou can now:")?;
        writeln!(out, "  • Run locally: ecoreborn serve")?;
        writeln!(out, "  • Visit: {app_url}")?;
    } else {
        writeln!(out, "\n⚠️  SOME CHECKS FAILED ({passed}/{total} passed)")?;
        writeln!(out, "\nPlease review the failures above and fix them.")?;
    }

    writeln!(out, "\n{}", "=".repeat(70))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryConnector;

    struct Fixed(&'static str, bool);

    impl Check for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn title(&self) -> &'static str {
            "FIXED CHECK"
        }

        fn run<'a>(&'a self, _ctx: &'a CheckContext) -> CheckFuture<'a> {
            let passed = self.1;
            Box::pin(async move {
                let mut detail = Detail::default();
                detail.block("Fixed:").pass("ran");
                CheckOutcome::new(passed, detail)
            })
        }
    }

    struct Panicking;

    impl Check for Panicking {
        fn name(&self) -> &'static str {
            "Panicking"
        }

        fn title(&self) -> &'static str {
            "PANICKING CHECK"
        }

        fn run<'a>(&'a self, _ctx: &'a CheckContext) -> CheckFuture<'a> {
            Box::pin(async move { explode() })
        }
    }

    fn explode() -> CheckOutcome {
        panic!("boom")
    }

    fn context() -> (tempfile::TempDir, CheckContext) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = CheckContext {
            env: Environment::default(),
            root: dir.path().to_path_buf(),
            connector: Arc::new(MemoryConnector::unreachable("unused")),
        };
        (dir, ctx)
    }

    #[tokio::test]
    async fn test_results_keep_run_order() {
        let (_dir, ctx) = context();
        let doctor = Doctor::with_checks(vec![
            Box::new(Fixed("Zeta", true)),
            Box::new(Fixed("Alpha", true)),
            Box::new(Fixed("Mid", true)),
        ]);

        let report = doctor.run(&ctx, &mut io::sink()).await.unwrap();

        let names: Vec<_> = report.results.keys().copied().collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
        assert!(report.all_passed());
        assert_eq!(report.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_single_failure_fails_run() {
        let (_dir, ctx) = context();
        let doctor = Doctor::with_checks(vec![
            Box::new(Fixed("One", true)),
            Box::new(Fixed("Two", false)),
            Box::new(Fixed("Three", true)),
        ]);

        let mut out = Vec::new();
        let report = doctor.run(&ctx, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(!report.all_passed());
        assert_eq!(report.passed(), 2);
        assert_eq!(report.exit_code(), 1);
        assert!(text.contains("❌ Two: FAIL"));
        assert!(text.contains("SOME CHECKS FAILED (2/3 passed)"));
    }

    #[tokio::test]
    async fn test_panicking_check_does_not_stop_the_run() {
        let (_dir, ctx) = context();
        let doctor = Doctor::with_checks(vec![
            Box::new(Panicking),
            Box::new(Fixed("After", true)),
        ]);

        let report = doctor.run(&ctx, &mut io::sink()).await.unwrap();

        assert_eq!(report.results.get("Panicking"), Some(&false));
        assert_eq!(report.results.get("After"), Some(&true));
        let detail = &report.details["Panicking"];
        assert_eq!(detail.find(report::Mark::Fail, "boom").count(), 1);
    }

    #[tokio::test]
    async fn test_report_sections_are_numbered() {
        let (_dir, ctx) = context();
        let doctor = Doctor::with_checks(vec![Box::new(Fixed("Only", true))]);

        let mut out = Vec::new();
        doctor.run(&ctx, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(" 1. FIXED CHECK\n"));
        assert!(text.contains(" 2. CONFIGURATION FILES CHECK\n"));
        assert!(text.contains("ALL CHECKS PASSED (1/1)"));
    }
}
