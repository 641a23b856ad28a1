//! Standalone database diagnostic (`ecoreborn check-db`).
//!
//! Connects once, lists what the database actually holds and ends with a
//! diagnosis of what to do next. Only [`Diagnosis::Healthy`] exits with 0.

use crate::config::{DEFAULT_DB_NAME, Environment, get_env_or_file};
use crate::doctor::report::write_block_title;
use crate::error::DiagnosticError;
use crate::port::{Connector, DocumentStore};
use crate::probe::{self, CollectionStatus, mask_uri};
use mongodb::bson::Document;
use std::io::Write;

const RULE: &str = "======================================================================";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnosis {
    /// The database holds no collections at all.
    Empty,
    /// Some expected collections do not exist.
    MissingCollections { missing: Vec<&'static str> },
    /// Every expected collection exists but none holds a document.
    NoDocuments,
    Healthy { total_documents: u64 },
}

impl Diagnosis {
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Diagnosis::Healthy { .. } => 0,
            _ => 1,
        }
    }
}

/// Run the diagnostic, writing the report to `out`.
pub async fn run(
    env: &Environment,
    connector: &dyn Connector,
    out: &mut dyn Write,
) -> Result<Diagnosis, DiagnosticError> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "MONGODB DATABASE DIAGNOSTIC")?;
    writeln!(out, "{RULE}")?;

    write_block_title(out, "1. CHECKING ENVIRONMENT VARIABLES:")?;
    let uri = match get_env_or_file(env, "MONGODB_URI") {
        Ok(Some(uri)) => uri,
        Ok(None) => {
            writeln!(out, "✗ MONGODB_URI: NOT SET")?;
            writeln!(out, "\n❌ ERROR: MONGODB_URI is not set!")?;
            writeln!(out, "Please check your .env file.")?;
            return Err(DiagnosticError::MissingUri);
        }
        Err(e) => {
            writeln!(out, "✗ MONGODB_URI: {e}")?;
            return Err(e.into());
        }
    };
    let db_name = env.get("MONGODB_DB_NAME").unwrap_or(DEFAULT_DB_NAME);
    writeln!(out, "✓ MONGODB_URI: {}", mask_uri(&uri))?;
    writeln!(out, "✓ MONGODB_DB_NAME: {db_name}")?;

    write_block_title(out, "2. TESTING DATABASE CONNECTION:")?;
    let store = match probe::connect(connector, &uri, db_name).await {
        Ok(store) => {
            writeln!(out, "✓ Connection successful!")?;
            store
        }
        Err(e) => {
            writeln!(out, "✗ Connection failed: {e}")?;
            writeln!(out, "\n❌ Possible issues:")?;
            writeln!(out, "   - Check the database username and password")?;
            writeln!(out, "   - Check the network access list of the cluster")?;
            writeln!(out, "   - Check database user permissions")?;
            return Err(e.into());
        }
    };

    let total_documents = write_inventory(out, store.as_ref()).await?;
    let report = probe::probe(store.as_ref()).await?;

    write_block_title(out, "4. COLLECTION DETAILS:")?;
    for (expected, status) in &report.expected {
        match status {
            CollectionStatus::Present(descriptor) => {
                writeln!(out, "\n✓ {}:", expected.name)?;
                writeln!(out, "  Documents: {}", descriptor.document_count)?;
                if descriptor.document_count > 0 {
                    write_samples(out, store.as_ref(), expected.name).await?;
                }
            }
            CollectionStatus::Missing => writeln!(out, "\n✗ {}: MISSING", expected.name)?,
        }
    }

    let diagnosis = if report.existing.is_empty() {
        Diagnosis::Empty
    } else if !report.all_present() {
        Diagnosis::MissingCollections {
            missing: report.missing().map(|c| c.name).collect(),
        }
    } else if total_documents == 0 {
        Diagnosis::NoDocuments
    } else {
        Diagnosis::Healthy { total_documents }
    };

    write_diagnosis(out, &diagnosis)?;
    Ok(diagnosis)
}

/// Print every collection with its count; returns the total across them.
async fn write_inventory(out: &mut dyn Write, store: &dyn DocumentStore) -> Result<u64, DiagnosticError> {
    write_block_title(out, "3. DATABASE COLLECTIONS:")?;
    let names = store.list_collection_names().await?;
    if names.is_empty() {
        writeln!(out, "✗ No collections found!")?;
        writeln!(out, "\n⚠️  Database has not been initialized.")?;
        return Ok(0);
    }

    writeln!(out, "✓ Found {} collection(s):", names.len())?;
    let mut total = 0;
    for name in &names {
        let count = store.count_documents(name).await?;
        total += count;
        writeln!(out, "  • {name}: {count} document(s)")?;
    }
    Ok(total)
}

fn field<'d>(document: &'d Document, key: &str) -> &'d str {
    document.get_str(key).unwrap_or("None")
}

async fn write_samples(
    out: &mut dyn Write,
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<(), DiagnosticError> {
    let Some(sample) = store.find_one(collection).await? else {
        return Ok(());
    };
    let keys: Vec<&str> = sample.keys().map(String::as_str).collect();
    writeln!(out, "  Sample fields: [{}]", keys.join(", "))?;

    match collection {
        "users" => {
            writeln!(out, "  Users:")?;
            for user in store.find_projected(collection, &["email", "name"]).await? {
                writeln!(out, "    - {} ({})", field(&user, "name"), field(&user, "email"))?;
            }
        }
        "newsletter_subscribers" => {
            writeln!(out, "  Subscribers:")?;
            for subscriber in store.find_projected(collection, &["email"]).await? {
                writeln!(out, "    - {}", field(&subscriber, "email"))?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn write_diagnosis(out: &mut dyn Write, diagnosis: &Diagnosis) -> std::io::Result<()> {
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "DIAGNOSIS:")?;
    writeln!(out, "{RULE}")?;

    match diagnosis {
        Diagnosis::Empty => {
            writeln!(out, "\n❌ ISSUE: Database is empty")?;
            writeln!(out, "\n📝 SOLUTION:")?;
            writeln!(out, "   Initialize the database, then run this diagnostic again.")?;
        }
        Diagnosis::MissingCollections { missing } => {
            writeln!(out, "\n⚠️  ISSUE: Some collections are missing")?;
            writeln!(out, "   Missing: {}", missing.join(", "))?;
            writeln!(out, "\n📝 SOLUTION:")?;
            writeln!(out, "   Re-run the database initialization.")?;
        }
        Diagnosis::NoDocuments => {
            writeln!(out, "\n⚠️  ISSUE: Collections exist but are empty")?;
            writeln!(out, "\n📝 SOLUTION:")?;
            writeln!(out, "   1. Check that the database initialization completed")?;
            writeln!(out, "   2. Use the application to create data (signup, contact form)")?;
        }
        Diagnosis::Healthy { total_documents } => {
            writeln!(out, "\n✅ DATABASE IS WORKING PROPERLY!")?;
            writeln!(out, "\n   Total documents: {total_documents}")?;
            writeln!(out, "   All collections present with data.")?;
        }
    }
    writeln!(out, "{RULE}")
}
