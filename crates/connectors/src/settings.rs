use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://es.{region}.amazonaws.com";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Transport configuration shared by every region session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Endpoint template; `{region}` is substituted per session.
    pub endpoint: String,
    pub regions: Vec<String>,
    pub timeout_secs: u64,
    pub bearer_token: Option<String>,
}

impl ClientSettings {
    pub fn endpoint_for(&self, region: &str) -> String {
        self.endpoint.replace("{region}", region)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            regions: vec![DEFAULT_REGION.to_string()],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            bearer_token: None,
        }
    }
}
