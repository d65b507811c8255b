use crate::{config::ConfigError, models::game::Phase};

/// Failures of the key-value store and the JSON values kept in it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt value under key {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Could not create store directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected session transitions. None of these change the session.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No question available for {}", continent.as_deref().unwrap_or("the world"))]
    NoQuestionAvailable { continent: Option<String> },

    #[error("Continent mode needs a continent")]
    ContinentRequired,

    #[error("Not awaiting an answer while {0:?}")]
    NotAwaitingAnswer(Phase),

    #[error("Cannot advance while {0:?}")]
    NotInFeedback(Phase),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
