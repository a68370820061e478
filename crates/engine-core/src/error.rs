use connectors::error::{FetchError, SessionError};
use thiserror::Error;

/// Failure of one lookup or enumeration. Transport errors pass through
/// untouched; records already emitted stay emitted.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The region-scoped client could not be built; nothing was fetched.
    #[error(transparent)]
    Setup(#[from] SessionError),

    /// A page fetch or the lookup call failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl QueryError {
    pub fn is_setup(&self) -> bool {
        matches!(self, QueryError::Setup(_))
    }
}
