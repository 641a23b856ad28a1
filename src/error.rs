use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Failed to read {name}: {reason}")]
    SecretFile { name: String, reason: String },
}

/// Errors raised while talking to the document store.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid connection string: {0}")]
    InvalidUri(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query on {collection} failed: {reason}")]
    Query { collection: String, reason: String },
}

/// Errors raised by the model repositories.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors that stop the database diagnostic before it reaches a diagnosis.
#[derive(Error, Debug)]
pub enum DiagnosticError {
    #[error("MONGODB_URI is not set")]
    MissingUri,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
