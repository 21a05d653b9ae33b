//! Error types for the DataForSEO adapter

use thiserror::Error;
use tracker_application::GatewayError;

/// Result type alias for DataForSEO operations
pub type Result<T> = std::result::Result<T, DataForSeoError>;

/// Errors that can occur when talking to the DataForSEO API
#[derive(Error, Debug)]
pub enum DataForSeoError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Envelope-level failure (`status_code` other than 20000)
    #[error("DataForSEO API error: {0}")]
    Api(String),

    /// Task-level failure inside an accepted envelope
    #[error("Task error: {0}")]
    Task(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Environment variable {0} is not set")]
    MissingCredentials(String),
}

impl From<DataForSeoError> for GatewayError {
    fn from(e: DataForSeoError) -> Self {
        let message = e.to_string();
        match e {
            DataForSeoError::Status { status: 401, .. } | DataForSeoError::MissingCredentials(_) => {
                GatewayError::AuthenticationFailed(message)
            }
            DataForSeoError::Status { .. } | DataForSeoError::Api(_) | DataForSeoError::Task(_) => {
                GatewayError::Api(message)
            }
            DataForSeoError::MalformedPayload(msg) => GatewayError::MalformedPayload(msg),
            DataForSeoError::Http(_) => GatewayError::ConnectionError(message),
        }
    }
}
