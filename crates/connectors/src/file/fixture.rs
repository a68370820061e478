use crate::{
    error::{FetchError, SessionError},
    fetcher::{FetchPageRequest, PageFetcher},
    session::SessionProvider,
    wire::DescribeReservedInstancesOutput,
};
use async_trait::async_trait;
use model::{pagination::page::Page, records::reserved_instance::ReservedInstance};
use std::{path::Path, sync::Arc};
use tracing::debug;

/// Serves DescribeReservedInstances responses recorded in a JSON file.
///
/// The file is an array of response pages. A request without a token gets
/// the first page; a request carrying token `t` gets the page after the
/// first page whose `NextToken` is `t`. The reservation id filter narrows
/// each page the way the remote service would. `maxResults` is ignored,
/// pages are served as recorded.
#[derive(Clone)]
pub struct FixtureFetcher {
    region: String,
    pages: Arc<Vec<DescribeReservedInstancesOutput>>,
}

impl FixtureFetcher {
    pub fn new(region: impl Into<String>, pages: Arc<Vec<DescribeReservedInstancesOutput>>) -> Self {
        FixtureFetcher {
            region: region.into(),
            pages,
        }
    }

    fn page_index(&self, request: &FetchPageRequest) -> Result<Option<usize>, FetchError> {
        let Some(token) = &request.next_token else {
            return Ok((!self.pages.is_empty()).then_some(0));
        };

        self.pages
            .iter()
            .position(|p| p.next_token.as_ref() == Some(token))
            .map(|idx| (idx + 1 < self.pages.len()).then_some(idx + 1))
            .ok_or_else(|| FetchError::InvalidToken(token.to_string()))
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    type Record = ReservedInstance;

    async fn fetch_page(
        &self,
        request: &FetchPageRequest,
    ) -> Result<Page<ReservedInstance>, FetchError> {
        let Some(idx) = self.page_index(request)? else {
            return Ok(Page::default());
        };

        let mut page = self.pages[idx].clone().into_page();
        if let Some(filter) = &request.filter {
            page.records.retain(|r| r.id() == Some(filter.value()));
        }
        Ok(page)
    }

    fn scope(&self) -> &str {
        &self.region
    }
}

/// Every region sees the same recorded pages.
#[derive(Clone)]
pub struct FixtureSessionProvider {
    pages: Arc<Vec<DescribeReservedInstancesOutput>>,
}

impl FixtureSessionProvider {
    pub fn new(pages: Vec<DescribeReservedInstancesOutput>) -> Self {
        FixtureSessionProvider {
            pages: Arc::new(pages),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let pages: Vec<DescribeReservedInstancesOutput> = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), pages = pages.len(), "Loaded fixture.");
        Ok(Self::new(pages))
    }
}

#[async_trait]
impl SessionProvider for FixtureSessionProvider {
    type Fetcher = FixtureFetcher;

    async fn connect(&self, region: &str) -> Result<FixtureFetcher, SessionError> {
        if region.trim().is_empty() {
            return Err(SessionError::MissingRegion);
        }
        Ok(FixtureFetcher::new(region, Arc::clone(&self.pages)))
    }
}
