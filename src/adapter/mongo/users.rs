use crate::domain::{Model, User};
use crate::error::StoreError;
use crate::port::{UserFuture, UserStore};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime, doc};
use mongodb::{Collection, Database};
use tracing::info;

/// MongoDB-backed [`UserStore`] for the `users` collection.
///
/// Passwords are stored as bcrypt hashes.
pub struct MongoUsers {
    users: Collection<User>,
    hash_cost: u32,
}

impl MongoUsers {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self::with_cost(db, bcrypt::DEFAULT_COST)
    }

    #[must_use]
    pub fn with_cost(db: &Database, hash_cost: u32) -> Self {
        Self {
            users: db.collection(User::COLLECTION),
            hash_cost,
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// bcrypt is CPU-bound; hash on the blocking pool so request workers stay free.
async fn hash_password(password: &str, cost: u32) -> Result<String, StoreError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

impl UserStore for MongoUsers {
    fn create<'a>(
        &'a self,
        name: &'a str,
        email: &'a str,
        password: &'a str,
    ) -> UserFuture<'a, User> {
        Box::pin(async move {
            let email = normalize_email(email);
            if self.users.find_one(doc! { "email": email.as_str() }).await?.is_some() {
                return Err(StoreError::DuplicateEmail(email));
            }

            let mut user = User {
                id: None,
                name: name.trim().to_string(),
                email,
                password_hash: hash_password(password, self.hash_cost).await?,
                created_at: DateTime::now(),
            };
            let result = self.users.insert_one(&user).await?;
            user.id = result.inserted_id.as_object_id();
            info!(email = %user.email, "Created user");
            Ok(user)
        })
    }

    fn find_by_email<'a>(&'a self, email: &'a str) -> UserFuture<'a, Option<User>> {
        Box::pin(async move {
            let email = normalize_email(email);
            Ok(self.users.find_one(doc! { "email": email }).await?)
        })
    }

    fn find_by_id<'a>(&'a self, id: &'a ObjectId) -> UserFuture<'a, Option<User>> {
        Box::pin(async move { Ok(self.users.find_one(doc! { "_id": *id }).await?) })
    }

    fn verify_password(&self, user: &User, password: &str) -> bool {
        bcrypt::verify(password, &user.password_hash).unwrap_or(false)
    }

    fn update_password<'a>(&'a self, id: &'a ObjectId, password: &'a str) -> UserFuture<'a, bool> {
        Box::pin(async move {
            let hash = hash_password(password, self.hash_cost).await?;
            let result = self
                .users
                .update_one(doc! { "_id": *id }, doc! { "$set": { "password_hash": hash } })
                .await?;
            Ok(result.matched_count == 1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_password_runs_off_the_worker() {
        let hash = hash_password("correct-horse", 4).await.unwrap();
        assert!(bcrypt::verify("correct-horse", &hash).unwrap());
        assert!(!bcrypt::verify("wrong", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_hash_password_rejects_invalid_cost() {
        let result = hash_password("correct-horse", 1).await;
        assert!(matches!(result, Err(StoreError::Hash(_))));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[tokio::test]
    async fn test_verify_password_against_stored_hash() {
        // The driver connects lazily, so building the store needs no server.
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let store = MongoUsers::with_cost(&client.database("ecoreborn_test"), 4);

        let user = User {
            id: None,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: bcrypt::hash("correct-horse", 4).unwrap(),
            created_at: DateTime::now(),
        };

        assert!(store.verify_password(&user, "correct-horse"));
        assert!(!store.verify_password(&user, "wrong"));
    }

    #[tokio::test]
    async fn test_verify_password_rejects_malformed_hash() {
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let store = MongoUsers::new(&client.database("ecoreborn_test"));
        let user = User {
            id: None,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: "plaintext".into(),
            created_at: DateTime::now(),
        };
        assert!(!store.verify_password(&user, "plaintext"));
    }

    /// Store on a throwaway database, or `None` when no test server is configured.
    async fn live_store(tag: &str) -> Option<(MongoUsers, Database)> {
        let uri = std::env::var("ECOREBORN_TEST_MONGODB_URI").ok()?;
        let client = mongodb::Client::with_uri_str(&uri).await.unwrap();
        let db = client.database(&format!("ecoreborn_test_{tag}_{}", ObjectId::new()));
        Some((MongoUsers::with_cost(&db, 4), db))
    }

    #[tokio::test]
    async fn test_create_normalizes_and_rejects_duplicate_email() {
        let Some((store, db)) = live_store("create").await else {
            return;
        };

        let user = store
            .create("  Ana ", " Ana@Example.COM", "correct-horse")
            .await
            .unwrap();
        assert!(user.id.is_some());
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@example.com");
        assert_ne!(user.password_hash, "correct-horse");
        assert!(store.verify_password(&user, "correct-horse"));

        let err = store
            .create("Other", "ANA@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(ref e) if e == "ana@example.com"));

        db.drop().await.unwrap();
    }

    #[tokio::test]
    async fn test_find_by_email_and_id() {
        let Some((store, db)) = live_store("find").await else {
            return;
        };
        let created = store
            .create("Ana", "ana@example.com", "correct-horse")
            .await
            .unwrap();
        let id = created.id.unwrap();

        let by_email = store.find_by_email("  ANA@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, Some(id));

        let by_id = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ana@example.com");

        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(store.find_by_id(&ObjectId::new()).await.unwrap().is_none());

        db.drop().await.unwrap();
    }

    #[tokio::test]
    async fn test_update_password_replaces_hash() {
        let Some((store, db)) = live_store("update").await else {
            return;
        };
        let created = store
            .create("Ana", "ana@example.com", "old-password")
            .await
            .unwrap();
        let id = created.id.unwrap();

        assert!(store.update_password(&id, "new-password").await.unwrap());
        let updated = store.find_by_id(&id).await.unwrap().unwrap();
        assert!(store.verify_password(&updated, "new-password"));
        assert!(!store.verify_password(&updated, "old-password"));

        assert!(!store.update_password(&ObjectId::new(), "x").await.unwrap());

        db.drop().await.unwrap();
    }
}
