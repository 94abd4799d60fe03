//! Static client configuration.
//!
//! Configuration is read once at construction and never mutated. It can be
//! built in code or loaded from the environment:
//!
//! - `LINKER_API_KEY` (required)
//! - `LINKER_API_ENDPOINT` (optional, defaults to `DEFAULT_ENDPOINT`)

use std::fmt;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://api.linker.shop/public-api/v1";

pub const ENV_API_KEY: &str = "LINKER_API_KEY";
pub const ENV_ENDPOINT: &str = "LINKER_API_ENDPOINT";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    endpoint: String,
    api_key: String,
}

impl ClientConfig {
    /// Trailing slashes on `endpoint` are stripped.
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, ConfigError> {
        let endpoint = endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(ENV_API_KEY).ok_or(ConfigError::MissingVar(ENV_API_KEY))?;
        let endpoint = lookup(ENV_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self::new(&endpoint, &api_key)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
