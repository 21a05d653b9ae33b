//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No sources requested")]
    NoSources,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),
}
