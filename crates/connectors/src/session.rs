use crate::{error::SessionError, fetcher::PageFetcher};
use async_trait::async_trait;

/// Supplies an authenticated, region-scoped fetcher. Construction failures
/// surface here, before any page is requested.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    type Fetcher: PageFetcher + 'static;

    async fn connect(&self, region: &str) -> Result<Self::Fetcher, SessionError>;
}
