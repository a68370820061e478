use crate::error::FetchError;
use async_trait::async_trait;
use model::{
    pagination::{cursor::ContinuationToken, page::Page},
    query::Filter,
};

/// Parameters of one DescribeReservedInstances round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPageRequest {
    pub filter: Option<Filter>,
    pub max_results: Option<u32>,
    pub next_token: Option<ContinuationToken>,
}

impl FetchPageRequest {
    /// Query string pairs in the remote API's naming. Absent values are
    /// left out rather than sent empty.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(filter) = &self.filter {
            params.push(("reservationId", filter.value().to_string()));
        }
        if let Some(max) = self.max_results {
            params.push(("maxResults", max.to_string()));
        }
        if let Some(token) = &self.next_token {
            params.push(("nextToken", token.as_str().to_string()));
        }
        params
    }
}

pub struct FetchPageRequestBuilder {
    filter: Option<Filter>,
    max_results: Option<u32>,
    next_token: Option<ContinuationToken>,
}

impl FetchPageRequestBuilder {
    pub fn new() -> Self {
        FetchPageRequestBuilder {
            filter: None,
            max_results: None,
            next_token: None,
        }
    }

    pub fn filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn next_token(mut self, next_token: Option<ContinuationToken>) -> Self {
        self.next_token = next_token;
        self
    }

    pub fn build(self) -> FetchPageRequest {
        FetchPageRequest {
            filter: self.filter,
            max_results: self.max_results,
            next_token: self.next_token,
        }
    }
}

impl Default for FetchPageRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One remote round trip: a bounded batch of records plus continuation
/// state. Implementations own the connection; callers only borrow them for
/// the duration of a query.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Record: Send + 'static;

    async fn fetch_page(&self, request: &FetchPageRequest)
    -> Result<Page<Self::Record>, FetchError>;

    /// Region or endpoint this fetcher is scoped to, for logging and row
    /// projection.
    fn scope(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_skip_absent_values() {
        let req = FetchPageRequestBuilder::new().build();
        assert!(req.query_params().is_empty());

        let req = FetchPageRequestBuilder::new()
            .filter(Some(Filter::reserved_instance_id("ri-123")))
            .max_results(20)
            .next_token(Some(ContinuationToken::new("tok")))
            .build();
        assert_eq!(
            req.query_params(),
            vec![
                ("reservationId", "ri-123".to_string()),
                ("maxResults", "20".to_string()),
                ("nextToken", "tok".to_string()),
            ]
        );
    }
}
