//! Error types for cashbook-store

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Rejected write: {message}")]
    InvalidWrite { message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;
