use thiserror::Error;

/// Errors produced by the Dark Sky client.
#[derive(Debug, Error)]
pub enum DarkSkyError {
    /// Neither an API key nor a proxy script was supplied in the config.
    #[error("API_KEY or PROXY_SCRIPT must be set in the Dark Sky config")]
    MissingCredentials,

    /// The configured proxy script is not a syntactically valid URL.
    #[error("invalid proxy script URL: '{0}'")]
    InvalidProxyUrl(String),

    /// The upstream answered with a non-2xx status.
    #[error("request to {url} failed: {status} {status_text}")]
    Status {
        url: String,
        status: u16,
        status_text: String,
    },

    /// The request never produced an HTTP response (DNS, connect, TLS, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body could not be parsed as forecast JSON.
    #[error("failed to parse forecast JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The upstream returned no usable payload.
    ///
    /// Usually means the key is wrong or the service is unreachable.
    #[error("there was a problem accessing darksky.net; make sure you have a valid key")]
    EmptyPayload,

    /// The forecast response lacks the block the requested view needs
    /// (`currently`, `hourly` or `daily`).
    #[error("forecast response is missing the '{0}' block")]
    MissingBlock(&'static str),

    /// A view kind string did not name one of the known forecast views.
    #[error("unknown view kind '{0}'; expected one of: current, today, week")]
    UnknownViewKind(String),
}
