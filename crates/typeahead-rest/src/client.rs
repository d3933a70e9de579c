//! A small JSON-over-HTTP client for search back ends.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use typeahead_rest::RestClient;
//!
//! # async fn run() -> typeahead_rest::Result<()> {
//! let client = RestClient::builder("https://erp.example.com/api/")
//!     .bearer_auth("my-token")
//!     .timeout(Duration::from_secs(5))
//!     .build()?;
//!
//! let parts = client
//!     .get_json("/parts/search", &[("q", "ab".to_string())])
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use tracing::Instrument;
use typeahead_core::logging::{span_names, targets};
use url::Url;

use crate::error::{RestError, Result};

/// Builder for [`RestClient`].
#[derive(Debug, Clone)]
pub struct RestClientBuilder {
    base_url: String,
    bearer: Option<String>,
    timeout: Option<Duration>,
    default_headers: Vec<(String, String)>,
}

impl RestClientBuilder {
    /// Create a new builder with the specified base URL.
    ///
    /// All request paths will be appended to this base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer: None,
            timeout: None,
            default_headers: Vec::new(),
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Fail requests that take longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header that will be sent with every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<RestClient> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &self.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RestError::InvalidHeader(e.to_string()))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| RestError::InvalidHeader(e.to_string()))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(RestClient {
            base_url,
            bearer: self.bearer,
            http,
        })
    }
}

/// A JSON client bound to one base URL.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    bearer: Option<String>,
    http: reqwest::Client,
}

impl RestClient {
    /// Create a builder for the given base URL.
    pub fn builder(base_url: impl Into<String>) -> RestClientBuilder {
        RestClientBuilder::new(base_url)
    }

    /// The base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The absolute URL of `path`. Leading slashes on `path` are optional.
    pub fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", self.base_url, path))?)
    }

    /// `GET path?query` and parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Statuses outside 2xx become [`RestError::Status`] carrying the body;
    /// bodies that are not JSON become [`RestError::Decode`].
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value> {
        let url = self.url(path)?;
        let span = tracing::debug_span!(target: targets::REST, span_names::REST_REQUEST, %url);

        async move {
            let mut request = self.http.get(url).query(query);
            if let Some(token) = &self.bearer {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                tracing::debug!(target: targets::REST, status = status.as_u16(), "request rejected");
                return Err(RestError::Status {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.bytes().await?;
            tracing::trace!(target: targets::REST, bytes = body.len(), "response received");
            Ok(serde_json::from_slice(&body)?)
        }
        .instrument(span)
        .await
    }
}
