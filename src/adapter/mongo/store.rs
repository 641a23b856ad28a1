use crate::error::ProbeError;
use crate::port::{Connector, DocumentStore, StoreFuture};
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Upper bound for selecting a server before a connection attempt is reported as failed.
pub const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_millis(5000);

const APP_NAME: &str = "ecoreborn";

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect to `uri` and confirm the server answers a `ping`.
    ///
    /// The attempt is bounded by [`SERVER_SELECTION_TIMEOUT`] and is not retried.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, ProbeError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| ProbeError::InvalidUri(e.to_string()))?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        options.connect_timeout = Some(SERVER_SELECTION_TIMEOUT);
        options.app_name = Some(APP_NAME.to_string());

        let client =
            Client::with_options(options).map_err(|e| ProbeError::InvalidUri(e.to_string()))?;
        let db = client.database(db_name);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ProbeError::Connection(e.to_string()))?;
        debug!(database = db_name, "MongoDB ping succeeded");

        Ok(Self { db })
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn query_error(collection: &str) -> impl FnOnce(mongodb::error::Error) -> ProbeError + '_ {
    move |e| ProbeError::Query {
        collection: collection.to_string(),
        reason: e.to_string(),
    }
}

impl DocumentStore for MongoStore {
    fn list_collection_names(&self) -> StoreFuture<'_, Vec<String>> {
        Box::pin(async move {
            let mut names = self
                .db
                .list_collection_names()
                .await
                .map_err(query_error("*"))?;
            names.sort();
            Ok(names)
        })
    }

    fn count_documents<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, u64> {
        Box::pin(async move {
            self.db
                .collection::<Document>(collection)
                .count_documents(doc! {})
                .await
                .map_err(query_error(collection))
        })
    }

    fn index_count<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, usize> {
        Box::pin(async move {
            let names = self
                .db
                .collection::<Document>(collection)
                .list_index_names()
                .await
                .map_err(query_error(collection))?;
            Ok(names.len())
        })
    }

    fn find_one<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, Option<Document>> {
        Box::pin(async move {
            self.db
                .collection::<Document>(collection)
                .find_one(doc! {})
                .await
                .map_err(query_error(collection))
        })
    }

    fn find_projected<'a>(
        &'a self,
        collection: &'a str,
        fields: &'a [&'a str],
    ) -> StoreFuture<'a, Vec<Document>> {
        Box::pin(async move {
            let projection: Document = fields
                .iter()
                .map(|f| ((*f).to_string(), 1.into()))
                .collect();
            let cursor = self
                .db
                .collection::<Document>(collection)
                .find(doc! {})
                .projection(projection)
                .await
                .map_err(query_error(collection))?;
            cursor
                .try_collect::<Vec<_>>()
                .await
                .map_err(query_error(collection))
        })
    }
}

/// [`Connector`] backed by the official MongoDB driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct MongoConnector;

impl Connector for MongoConnector {
    fn connect<'a>(
        &'a self,
        uri: &'a str,
        db_name: &'a str,
    ) -> StoreFuture<'a, Arc<dyn DocumentStore>> {
        Box::pin(async move {
            let store = MongoStore::connect(uri, db_name).await?;
            Ok(Arc::new(store) as Arc<dyn DocumentStore>)
        })
    }
}
