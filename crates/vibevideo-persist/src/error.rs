use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Data API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[cfg(feature = "mongodb")]
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username or email already exists")]
    UserExists,

    #[error("Invalid stored payload: {0}")]
    InvalidPayload(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Persistence not configured: {0}")]
    NotConfigured(String),
}

pub type Result<T> = std::result::Result<T, PersistError>;
