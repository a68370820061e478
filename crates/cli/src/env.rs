use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use connectors::settings::{ClientSettings, DEFAULT_REGION};

use crate::error::CliError;

pub const ENDPOINT_VAR: &str = "OSRI_ENDPOINT";
pub const REGIONS_VAR: &str = "OSRI_REGIONS";
pub const TIMEOUT_VAR: &str = "OSRI_TIMEOUT_SECS";
pub const BEARER_TOKEN_VAR: &str = "OSRI_BEARER_TOKEN";

const REGION_FALLBACK_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];
const RELEVANT_PREFIXES: [&str; 2] = ["OSRI_", "AWS_"];

/// Environment variable manager that loads from system and .env files.
/// Variables already present in the process environment win over the file.
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    sensitive_patterns: Vec<String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    /// `<config dir>/osri/.env`, when the platform has a config dir.
    pub fn default_env_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("osri").join(".env"))
    }

    /// Load variables from a .env file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Transport settings from `OSRI_*` variables, falling back to the
    /// usual AWS region variables and then the built-in defaults.
    pub fn client_settings(&self) -> Result<ClientSettings, CliError> {
        let mut settings = ClientSettings::default();

        if let Some(endpoint) = self.get(ENDPOINT_VAR) {
            settings.endpoint = endpoint.trim().to_string();
        }

        let regions = self
            .get(REGIONS_VAR)
            .map(split_list)
            .filter(|r| !r.is_empty())
            .or_else(|| {
                REGION_FALLBACK_VARS
                    .iter()
                    .find_map(|var| self.get(var))
                    .map(|r| vec![r.trim().to_string()])
            })
            .unwrap_or_else(|| vec![DEFAULT_REGION.to_string()]);
        settings.regions = regions;

        if let Some(raw) = self.get(TIMEOUT_VAR) {
            settings.timeout_secs = raw.trim().parse().map_err(|_| {
                CliError::Config(format!("{TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"))
            })?;
        }

        settings.bearer_token = self.get(BEARER_TOKEN_VAR).map(str::to_string);
        Ok(settings)
    }

    /// The variables this tool reads, with sensitive values masked. Safe to
    /// log.
    pub fn redacted(&self) -> BTreeMap<String, String> {
        self.vars
            .iter()
            .filter(|(k, _)| RELEVANT_PREFIXES.iter().any(|p| k.starts_with(p)))
            .map(|(k, v)| {
                let value = if self.is_sensitive(k) {
                    "***".to_string()
                } else {
                    v.clone()
                };
                (k.clone(), value)
            })
            .collect()
    }

    fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.sensitive_patterns.iter().any(|p| key.contains(p))
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);

            // Parse KEY=VALUE format
            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim();
                let value = line[eq_pos + 1..].trim();

                if key.is_empty() {
                    return Err(CliError::Config(format!(
                        "Invalid env file: empty key at line {}",
                        line_num + 1
                    )));
                }

                let value = Self::unquote_value(value);
                self.vars.entry(key.to_string()).or_insert(value);
            } else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            }
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }

    /// Default patterns for sensitive variable detection
    fn default_sensitive_patterns() -> Vec<String> {
        [
            "password",
            "passwd",
            "secret",
            "token",
            "key",
            "auth",
            "credential",
            "private",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
