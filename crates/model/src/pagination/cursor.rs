use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque cursor handed back by the remote service. Only the page fetcher
/// interprets it; everyone else compares and forwards it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(token: impl Into<String>) -> Self {
        ContinuationToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Remote services sometimes answer with `""` instead of omitting the
    /// token on the last page.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContinuationToken {
    fn from(value: &str) -> Self {
        ContinuationToken::new(value)
    }
}

impl From<String> for ContinuationToken {
    fn from(value: String) -> Self {
        ContinuationToken(value)
    }
}
