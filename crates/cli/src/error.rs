use connectors::error::SessionError;
use engine_runtime::error::FanoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to set up fixture: {0}")]
    Fixture(#[from] SessionError),

    #[error("Query failed: {0}")]
    Query(#[from] FanoutError),

    #[error("Shutdown requested")]
    ShutdownRequested,
}
