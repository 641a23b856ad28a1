//! Shared test support utilities
//!
//! Provides an in-memory `DocumentStore` and a `Connector` that hands it out
//! (or fails like an unreachable server) for use in unit and integration tests.

use crate::error::ProbeError;
use crate::port::{Connector, DocumentStore, StoreFuture};
use crate::probe::EXPECTED_COLLECTIONS;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MemoryCollection {
    documents: Vec<Document>,
    index_count: usize,
}

/// Document store held in memory.
///
/// Every read goes to the current contents, so tests can mutate the store
/// between two probes.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, MemoryCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding every expected collection with `documents` documents each.
    pub fn with_expected_collections(documents: usize) -> Self {
        let store = Self::new();
        for collection in EXPECTED_COLLECTIONS {
            store.insert_many(collection.name, documents);
        }
        store
    }

    /// Append `count` generated documents, creating the collection (with the
    /// default `_id` index) if needed.
    pub fn insert_many(&self, collection: &str, count: usize) {
        let mut guard = self.collections.lock().unwrap();
        let entry = guard
            .entry(collection.to_string())
            .or_insert_with(|| MemoryCollection {
                documents: Vec::new(),
                index_count: 1,
            });
        let start = entry.documents.len();
        entry.documents.extend(
            (start..start + count).map(|seq| doc! { "_id": ObjectId::new(), "seq": seq as i64 }),
        );
    }

    pub fn insert(&self, collection: &str, document: Document) {
        self.insert_many(collection, 0);
        let mut guard = self.collections.lock().unwrap();
        if let Some(entry) = guard.get_mut(collection) {
            entry.documents.push(document);
        }
    }

    pub fn set_index_count(&self, collection: &str, count: usize) {
        self.insert_many(collection, 0);
        let mut guard = self.collections.lock().unwrap();
        if let Some(entry) = guard.get_mut(collection) {
            entry.index_count = count;
        }
    }

    pub fn drop_collection(&self, collection: &str) {
        self.collections.lock().unwrap().remove(collection);
    }

    fn with_collection<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&MemoryCollection) -> T,
    ) -> Result<T, ProbeError> {
        let guard = self.collections.lock().unwrap();
        guard.get(collection).map(f).ok_or_else(|| ProbeError::Query {
            collection: collection.to_string(),
            reason: "ns not found".to_string(),
        })
    }
}

impl DocumentStore for MemoryStore {
    fn list_collection_names(&self) -> StoreFuture<'_, Vec<String>> {
        let names: Vec<String> = self.collections.lock().unwrap().keys().cloned().collect();
        Box::pin(async move { Ok(names) })
    }

    fn count_documents<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, u64> {
        let result = self.with_collection(collection, |c| c.documents.len() as u64);
        Box::pin(async move { result })
    }

    fn index_count<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, usize> {
        let result = self.with_collection(collection, |c| c.index_count);
        Box::pin(async move { result })
    }

    fn find_one<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, Option<Document>> {
        // MongoDB returns None for a collection that does not exist.
        let result: Result<Option<Document>, ProbeError> = self
            .with_collection(collection, |c| c.documents.first().cloned())
            .or(Ok(None));
        Box::pin(async move { result })
    }

    fn find_projected<'a>(
        &'a self,
        collection: &'a str,
        fields: &'a [&'a str],
    ) -> StoreFuture<'a, Vec<Document>> {
        let result: Result<Vec<Document>, ProbeError> = self
            .with_collection(collection, |c| {
                c.documents
                    .iter()
                    .map(|d| {
                        d.iter()
                            .filter(|(k, _)| k.as_str() == "_id" || fields.contains(&k.as_str()))
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect::<Document>()
                    })
                    .collect()
            })
            .or(Ok(Vec::new()));
        Box::pin(async move { result })
    }
}

enum Target {
    Store(Arc<MemoryStore>),
    Unreachable(String),
}

/// Connector returning a shared [`MemoryStore`] or a fixed connection error.
pub struct MemoryConnector {
    target: Target,
    attempts: AtomicUsize,
}

impl MemoryConnector {
    pub fn reachable(store: Arc<MemoryStore>) -> Self {
        Self {
            target: Target::Store(store),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            target: Target::Unreachable(message.to_string()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of connection attempts made so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connector for MemoryConnector {
    fn connect<'a>(
        &'a self,
        _uri: &'a str,
        _db_name: &'a str,
    ) -> StoreFuture<'a, Arc<dyn DocumentStore>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let result = match &self.target {
            Target::Store(store) => Ok(store.clone() as Arc<dyn DocumentStore>),
            Target::Unreachable(message) => Err(ProbeError::Connection(message.clone())),
        };
        Box::pin(async move { result })
    }
}
