use crate::paging::PageRequest;
use connectors::{
    error::FetchError,
    fetcher::{FetchPageRequestBuilder, PageFetcher},
};
use model::pagination::{cursor::ContinuationToken, page::Page};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Walks the remote pages of one [`PageRequest`] in order.
///
/// Every token sent is remembered. A returned token that was already sent
/// ends pagination, so a service answering with a cyclic token cannot keep
/// us looping. An empty token counts as "no more pages".
pub struct Paginator<'a, F: PageFetcher> {
    fetcher: &'a F,
    request: PageRequest,
    next_token: Option<ContinuationToken>,
    first_page: bool,
    seen: HashSet<ContinuationToken>,
    duplicate_token: bool,
    pages: usize,
}

impl<'a, F: PageFetcher> Paginator<'a, F> {
    pub fn new(fetcher: &'a F, request: PageRequest) -> Self {
        Paginator {
            fetcher,
            request,
            next_token: None,
            first_page: true,
            seen: HashSet::new(),
            duplicate_token: false,
            pages: 0,
        }
    }

    pub fn has_more_pages(&self) -> bool {
        self.first_page || self.next_token.is_some()
    }

    /// Pagination ended because the service repeated a token.
    pub fn stopped_on_duplicate_token(&self) -> bool {
        self.duplicate_token
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Fetch the next page. Once [`has_more_pages`](Self::has_more_pages)
    /// is false this returns an empty page without a remote call.
    pub async fn next_page(&mut self) -> Result<Page<F::Record>, FetchError> {
        if !self.has_more_pages() {
            return Ok(Page::default());
        }

        let request = FetchPageRequestBuilder::new()
            .filter(self.request.filter().cloned())
            .max_results(self.request.page_size())
            .next_token(self.next_token.clone())
            .build();
        let page = self.fetcher.fetch_page(&request).await?;

        self.first_page = false;
        self.pages += 1;
        if let Some(sent) = self.next_token.take() {
            self.seen.insert(sent);
        }

        self.next_token = match &page.next_token {
            Some(token) if token.is_empty() => None,
            Some(token) if self.seen.contains(token) => {
                warn!(
                    scope = self.fetcher.scope(),
                    token = %token,
                    page = self.pages,
                    "Duplicate continuation token. Stopping pagination."
                );
                self.duplicate_token = true;
                None
            }
            other => other.clone(),
        };

        debug!(
            scope = self.fetcher.scope(),
            page = self.pages,
            records = page.len(),
            has_more = self.next_token.is_some(),
            "Fetched page."
        );

        Ok(page)
    }
}
