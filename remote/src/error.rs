//! Error types for the remote event service

use thiserror::Error;

/// Errors that can occur when querying the remote event service
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The base URL could not be parsed or extended with the endpoint path
    #[error("Invalid server URL '{url}': {message}")]
    InvalidUrl {
        /// URL as given
        url: String,
        /// Parser message
        message: String,
    },

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Server answered with something other than 200 OK
    #[error("Server error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response body was not a JSON array of event records
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}
