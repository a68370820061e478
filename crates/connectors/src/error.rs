use thiserror::Error;

/// Failures of a single remote round trip.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected our credentials.
    #[error("Not authorized (status {status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Any other non-success status.
    #[error("Remote call failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A continuation token the fetcher did not issue.
    #[error("Invalid continuation token: {0}")]
    InvalidToken(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Failures while building a region-scoped client, before any page is
/// requested.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No region configured")]
    MissingRegion,

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("No session available for region '{0}'")]
    UnknownRegion(String),

    #[error("Failed to read fixture: {0}")]
    FixtureRead(#[from] std::io::Error),

    #[error("Failed to parse fixture: {0}")]
    FixtureParse(#[from] serde_json::Error),
}
