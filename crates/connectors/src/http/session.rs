use crate::{
    error::SessionError,
    http::fetcher::{DESCRIBE_RESERVED_INSTANCES_PATH, HttpPageFetcher},
    session::SessionProvider,
    settings::ClientSettings,
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

const USER_AGENT: &str = concat!("osri/", env!("CARGO_PKG_VERSION"));

/// Builds one [`HttpPageFetcher`] per region from shared settings.
#[derive(Debug, Clone)]
pub struct HttpSessionProvider {
    settings: ClientSettings,
}

impl HttpSessionProvider {
    pub fn new(settings: ClientSettings) -> Self {
        HttpSessionProvider { settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn describe_url(&self, region: &str) -> Result<Url, SessionError> {
        let endpoint = self.settings.endpoint_for(region);
        let invalid = |reason: String| SessionError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            reason,
        };

        let base = Url::parse(&endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }
        base.join(DESCRIBE_RESERVED_INSTANCES_PATH)
            .map_err(|e| invalid(e.to_string()))
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    type Fetcher = HttpPageFetcher;

    async fn connect(&self, region: &str) -> Result<HttpPageFetcher, SessionError> {
        let region = region.trim();
        if region.is_empty() {
            return Err(SessionError::MissingRegion);
        }

        let url = self.describe_url(region)?;
        let client = Client::builder()
            .timeout(self.settings.timeout())
            .user_agent(USER_AGENT)
            .build()?;

        debug!(region, url = %url, "Created HTTP session.");
        Ok(HttpPageFetcher::new(
            client,
            url,
            region.to_string(),
            self.settings.bearer_token.clone(),
        ))
    }
}
