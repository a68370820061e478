use engine_core::error::QueryError;
use thiserror::Error;

/// Top-level errors of a multi-region query.
#[derive(Debug, Error)]
pub enum FanoutError {
    #[error("No regions to query")]
    NoRegions,

    /// A region failed to connect or fetch. Rows already forwarded from
    /// other regions stay forwarded.
    #[error("Region '{region}': {source}")]
    Region {
        region: String,
        #[source]
        source: QueryError,
    },

    /// An error occurred while joining a region task.
    /// This usually indicates that the task panicked.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl FanoutError {
    pub fn region(region: impl Into<String>, source: impl Into<QueryError>) -> Self {
        FanoutError::Region {
            region: region.into(),
            source: source.into(),
        }
    }
}
