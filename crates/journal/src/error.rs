// In crates/journal/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to serialize engine state: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("State store operation failed: {0}")]
    Store(#[from] std::io::Error),
    #[error("Stored state has schema version {found}, this build expects {expected}")]
    SchemaMismatch { found: u32, expected: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
