pub mod store;
pub mod users;

pub use store::{MongoConnector, MongoStore, SERVER_SELECTION_TIMEOUT};
pub use users::MongoUsers;
