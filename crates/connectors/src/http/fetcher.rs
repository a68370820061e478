use crate::{
    error::FetchError,
    fetcher::{FetchPageRequest, PageFetcher},
    wire::DescribeReservedInstancesOutput,
};
use async_trait::async_trait;
use model::{pagination::page::Page, records::reserved_instance::ReservedInstance};
use reqwest::{Client, StatusCode, Url};
use std::fmt;
use tracing::trace;

pub const DESCRIBE_RESERVED_INSTANCES_PATH: &str = "/2021-01-01/opensearch/reservedInstances";

/// DescribeReservedInstances over HTTP for a single region.
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
    url: Url,
    region: String,
    bearer_token: Option<String>,
}

impl HttpPageFetcher {
    pub fn new(client: Client, url: Url, region: String, bearer_token: Option<String>) -> Self {
        HttpPageFetcher {
            client,
            url,
            region,
            bearer_token,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Debug for HttpPageFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("url", &self.url.as_str())
            .field("region", &self.region)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    type Record = ReservedInstance;

    async fn fetch_page(
        &self,
        request: &FetchPageRequest,
    ) -> Result<Page<ReservedInstance>, FetchError> {
        let mut builder = self
            .client
            .get(self.url.clone())
            .query(&request.query_params());
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!(region = %self.region, status = status.as_u16(), bytes = body.len(), "Received response.");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let output: DescribeReservedInstancesOutput = serde_json::from_str(&body)?;
        Ok(output.into_page())
    }

    fn scope(&self) -> &str {
        &self.region
    }
}
