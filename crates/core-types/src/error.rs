// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown trading style: '{0}' (expected one of: day, swing, scalp)")]
    UnknownStyle(String),
}

pub type Result<T> = std::result::Result<T, Error>;
