use crate::domain::User;
use crate::error::{ProbeError, StoreError};
use mongodb::bson::Document;
use mongodb::bson::oid::ObjectId;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProbeError>> + Send + 'a>>;
pub type UserFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Read-only view of a document database, as seen by the diagnostics.
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
pub trait DocumentStore: Send + Sync {
    fn list_collection_names(&self) -> StoreFuture<'_, Vec<String>>;

    /// Exact document count (a count query, not an estimate).
    fn count_documents<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, u64>;

    fn index_count<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, usize>;

    fn find_one<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, Option<Document>>;

    /// All documents of `collection`, projected to `fields`.
    fn find_projected<'a>(
        &'a self,
        collection: &'a str,
        fields: &'a [&'a str],
    ) -> StoreFuture<'a, Vec<Document>>;
}

/// Opens a [`DocumentStore`] for a connection string and database name.
///
/// Implementations must bound the attempt by a server selection timeout and
/// must not retry.
pub trait Connector: Send + Sync {
    fn connect<'a>(&'a self, uri: &'a str, db_name: &'a str)
    -> StoreFuture<'a, Arc<dyn DocumentStore>>;
}

/// Persistence operations on [`User`] accounts.
pub trait UserStore: Send + Sync {
    /// Hash `password` and insert a new user. Emails are stored lowercased.
    fn create<'a>(&'a self, name: &'a str, email: &'a str, password: &'a str)
    -> UserFuture<'a, User>;

    fn find_by_email<'a>(&'a self, email: &'a str) -> UserFuture<'a, Option<User>>;

    fn find_by_id<'a>(&'a self, id: &'a ObjectId) -> UserFuture<'a, Option<User>>;

    fn verify_password(&self, user: &User, password: &str) -> bool;

    /// Returns `false` when no user has `id`.
    fn update_password<'a>(&'a self, id: &'a ObjectId, password: &'a str)
    -> UserFuture<'a, bool>;
}

/// Operations every [`UserStore`] provides, in declaration order.
pub const USER_STORE_METHODS: [&str; 5] = [
    "create",
    "find_by_email",
    "find_by_id",
    "verify_password",
    "update_password",
];
