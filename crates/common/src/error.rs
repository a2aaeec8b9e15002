//! Error types

use thiserror::Error;

/// Main error type for Donor Rewards
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
