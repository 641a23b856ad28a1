use mongodb::bson::DateTime;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A document type persisted in one of the expected collections.
pub trait Model {
    const NAME: &'static str;
    const COLLECTION: &'static str;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime,
}

impl Model for User {
    const NAME: &'static str = "User";
    const COLLECTION: &'static str = "users";
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewsletterSubscriber {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub subscribed_at: DateTime,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Model for NewsletterSubscriber {
    const NAME: &'static str = "NewsletterSubscriber";
    const COLLECTION: &'static str = "newsletter_subscribers";
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContactMessage {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime,
}

impl Model for ContactMessage {
    const NAME: &'static str = "ContactMessage";
    const COLLECTION: &'static str = "contact_messages";
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServiceRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service_type: String,
    pub details: String,
    #[serde(default)]
    pub status: RequestStatus,
    pub created_at: DateTime,
}

impl Model for ServiceRequest {
    const NAME: &'static str = "ServiceRequest";
    const COLLECTION: &'static str = "service_requests";
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

fn default_true() -> bool {
    true
}

/// Name and collection of every model, in the order the diagnostics report them.
pub const MODELS: [(&str, &str); 4] = [
    (User::NAME, User::COLLECTION),
    (NewsletterSubscriber::NAME, NewsletterSubscriber::COLLECTION),
    (ContactMessage::NAME, ContactMessage::COLLECTION),
    (ServiceRequest::NAME, ServiceRequest::COLLECTION),
];

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn test_service_request_status_defaults_to_pending() {
        let document = doc! {
            "name": "Ana",
            "email": "ana@example.com",
            "service_type": "recycling",
            "details": "Two sofas",
            "created_at": DateTime::now(),
        };
        let request: ServiceRequest = bson::from_document(document).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.id.is_none());
    }

    #[test]
    fn test_user_without_id_omits_underscore_id() {
        let user = User {
            id: None,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: "$2b$12$hash".into(),
            created_at: DateTime::now(),
        };
        let document = bson::to_document(&user).unwrap();
        assert!(!document.contains_key("_id"));
        assert_eq!(document.get_str("email").unwrap(), "ana@example.com");
    }
}
