use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DarkSkyError;

const DIRECT_API_BASE: &str = "https://api.darksky.net/forecast/";

/// Credentials for talking to Dark Sky.
///
/// Exactly one of the two fields needs to be set: either the raw API key
/// (the client talks to `api.darksky.net` directly) or the URL of a
/// caller-run proxy script that holds the real key. When both are present
/// the proxy wins.
///
/// The struct is serde-derived so host applications can embed it in their
/// own configuration files; the library itself never touches disk or
/// environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dark Sky API key, used to build the direct request URL.
    pub api_key: Option<String>,

    /// URL of a relay script; requests become `<proxy>?url=<lat>,<lon>`.
    pub proxy_script: Option<String>,
}

impl Config {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            proxy_script: None,
        }
    }

    pub fn with_proxy_script(proxy_script: impl Into<String>) -> Self {
        Self {
            api_key: None,
            proxy_script: Some(proxy_script.into()),
        }
    }

    /// Compute the request URL base for this config.
    ///
    /// Called once at client construction; the client keeps the result
    /// immutable afterwards.
    pub fn base_url(&self) -> Result<String, DarkSkyError> {
        if let Some(proxy) = &self.proxy_script {
            if Url::parse(proxy).is_err() {
                warn!(proxy = %proxy, "proxy script is not a valid URL");
                return Err(DarkSkyError::InvalidProxyUrl(proxy.clone()));
            }
            return Ok(format!("{proxy}?url="));
        }

        if let Some(key) = &self.api_key {
            return Ok(format!("{DIRECT_API_BASE}{key}/"));
        }

        warn!("API_KEY or PROXY_SCRIPT must be set in the Dark Sky config");
        Err(DarkSkyError::MissingCredentials)
    }
}
