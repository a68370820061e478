use crate::error::QueryError;
use connectors::fetcher::{FetchPageRequestBuilder, PageFetcher};
use model::{query::Filter, table::TABLE_NAME};
use tracing::{debug, error};

/// Point lookup by reservation id. One remote call, no pagination.
pub struct LookupResolver<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: PageFetcher> LookupResolver<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        LookupResolver { fetcher }
    }

    /// First record matching `key`, if any. An empty key means the caller
    /// has nothing to look up and returns `None` without a remote call.
    pub async fn resolve(&self, key: &str) -> Result<Option<F::Record>, QueryError> {
        if key.is_empty() {
            return Ok(None);
        }

        let request = FetchPageRequestBuilder::new()
            .filter(Some(Filter::reserved_instance_id(key)))
            .build();

        let page = self.fetcher.fetch_page(&request).await.map_err(|e| {
            error!(
                table = TABLE_NAME,
                scope = self.fetcher.scope(),
                error = %e,
                "Lookup call failed."
            );
            e
        })?;

        debug!(scope = self.fetcher.scope(), key, matches = page.len(), "Lookup finished.");
        Ok(page.records.into_iter().next())
    }
}
