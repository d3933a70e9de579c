//! Error types for REST search sources.

/// Errors raised while talking to a search back end.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// The base URL or a request path did not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A default header name or value was rejected.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The request failed before a response arrived.
    #[error("HTTP request error: {0}")]
    Request(#[source] reqwest::Error),

    /// The back end answered with a 4xx or 5xx status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, possibly empty.
        message: String,
    },

    /// The response body was not JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Picker settings could not be parsed.
    #[error("invalid picker settings: {0}")]
    Settings(#[from] toml::de::Error),

    /// An entity kind name was not recognized.
    #[error("unknown entity kind `{0}`")]
    UnknownEntity(String),
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}

/// A specialized Result type for REST operations.
pub type Result<T> = std::result::Result<T, RestError>;
