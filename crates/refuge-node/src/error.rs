//! Error types for Refuge nodes and clients.

use thiserror::Error;

/// Result type for Refuge node operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Refuge node and client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Capacity model rejected the operation
    #[error(transparent)]
    Core(#[from] refuge_core::Error),

    /// Loading a shelter snapshot failed
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Login or registration failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl Error {
    /// Message suitable for showing to the person using the app.
    pub fn user_message(&self) -> String {
        match self {
            Error::Core(refuge_core::Error::ShelterFull(id)) => {
                format!("Shelter {id} is full. No spots left.")
            }
            Error::Core(refuge_core::Error::ShelterNotFound(id)) => {
                format!("Shelter {id} was not found.")
            }
            Error::Core(refuge_core::Error::InvalidRegistration(reason)) => {
                format!("Registration rejected: {reason}.")
            }
            Error::Core(e) => e.to_string(),
            Error::FetchFailed(_) | Error::Http(_) => {
                "Could not load shelter data. Check your connection and the API.".to_string()
            }
            Error::AuthFailed(_) => "Incorrect e-mail or password.".to_string(),
            Error::InvalidInput(msg) => msg.clone(),
            Error::Storage(_) | Error::Serialization(_) | Error::Io(_) => {
                "Something went wrong. Try again.".to_string()
            }
        }
    }
}
