//! Weather server error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the weather server.
///
/// NWS failures never reach MCP clients; the tool handlers turn them into
/// fixed fallback text. They are still typed so they can be logged.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP client could not be built or the request could not be sent.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The NWS API answered with something other than 200 OK.
    #[error("HTTP error {status} from {url}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Building the shared HTTP client failed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The MCP service could not start or stopped abnormally.
    #[error("MCP service error: {0}")]
    Serve(String),
}

pub type Result<T> = std::result::Result<T, Error>;
