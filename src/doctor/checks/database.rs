use crate::config::{DEFAULT_DB_NAME, get_env_or_file};
use crate::doctor::report::Detail;
use crate::doctor::{Check, CheckContext, CheckFuture, CheckOutcome};
use crate::probe::{self, CollectionStatus};

pub struct DatabaseCheck;

impl Check for DatabaseCheck {
    fn name(&self) -> &'static str {
        "Database"
    }

    fn title(&self) -> &'static str {
        "DATABASE CONNECTION & COLLECTIONS"
    }

    fn run<'a>(&'a self, ctx: &'a CheckContext) -> CheckFuture<'a> {
        Box::pin(check_database(ctx))
    }
}

async fn check_database(ctx: &CheckContext) -> CheckOutcome {
    let mut detail = Detail::default();
    let db_name = ctx.env.get("MONGODB_DB_NAME").unwrap_or(DEFAULT_DB_NAME);

    let connection = detail.block("Connection Test:");
    let uri = match get_env_or_file(&ctx.env, "MONGODB_URI") {
        Ok(Some(uri)) => uri,
        Ok(None) => {
            connection.fail("Database connection failed: MONGODB_URI is not set");
            return CheckOutcome::new(false, detail);
        }
        Err(e) => {
            connection.fail(format!("Database connection failed: {e}"));
            return CheckOutcome::new(false, detail);
        }
    };

    let store = match probe::connect(ctx.connector.as_ref(), &uri, db_name).await {
        Ok(store) => {
            connection.pass("MongoDB connection successful");
            store
        }
        Err(e) => {
            connection.fail(format!("Database connection failed: {e}"));
            return CheckOutcome::new(false, detail);
        }
    };

    let report = match probe::probe(store.as_ref()).await {
        Ok(report) => report,
        Err(e) => {
            detail
                .block("Collections Status:")
                .fail(format!("Failed to inspect collections: {e}"));
            return CheckOutcome::new(false, detail);
        }
    };

    let collections = detail.block("Collections Status:");
    for (expected, status) in &report.expected {
        match status {
            CollectionStatus::Present(d) => collections.pass(format!(
                "{}: {} document(s) - {}",
                d.name, d.document_count, expected.description
            )),
            CollectionStatus::Missing => collections.fail(format!(
                "{}: MISSING - {}",
                expected.name, expected.description
            )),
        };
    }

    if !report.all_present() {
        collections.warn("Some collections are missing. Initialise the database before serving.");
        return CheckOutcome::new(false, detail);
    }

    let indexes = detail.block("Indexes Check:");
    for descriptor in report.descriptors() {
        indexes.pass(format!(
            "{}: {} index(es)",
            descriptor.name, descriptor.index_count
        ));
    }

    CheckOutcome::new(true, detail)
}
