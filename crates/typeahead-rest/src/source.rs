//! A [`SearchSource`] that queries a REST endpoint.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use typeahead::{BoxError, SearchFuture, SearchResponse, SearchSource};
use typeahead_core::logging::targets;

use crate::client::RestClient;

/// Default query parameter carrying the search term.
pub const DEFAULT_TERM_PARAM: &str = "q";

/// Searches by issuing `GET {endpoint}?{term_param}={term}&limit={limit}`.
///
/// The body may be a JSON list of `T` or an object with an `items` list of
/// `T`; anything else yields no suggestions.
pub struct RestSearchSource<T> {
    client: RestClient,
    endpoint: String,
    term_param: String,
    limit: Option<usize>,
    params: Vec<(String, String)>,
    _items: PhantomData<fn() -> T>,
}

impl<T> RestSearchSource<T> {
    /// Create a source for `endpoint`, relative to the client's base URL.
    pub fn new(client: RestClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            term_param: DEFAULT_TERM_PARAM.to_string(),
            limit: None,
            params: Vec::new(),
            _items: PhantomData,
        }
    }

    /// Use `name` as the query parameter for the term.
    pub fn term_param(mut self, name: impl Into<String>) -> Self {
        self.term_param = name.into();
        self
    }

    /// Ask the back end for at most `limit` results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Send an extra fixed query parameter with every search.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// The endpoint path.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn query(&self, term: &str) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(self.params.len() + 2);
        query.push((self.term_param.clone(), term.to_string()));
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        query.extend(self.params.iter().cloned());
        query
    }
}

impl<T> SearchSource<T> for RestSearchSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn search(&self, term: &str) -> SearchFuture<T> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let query = self.query(term);
        tracing::debug!(target: targets::REST, %endpoint, term, "searching");

        Box::pin(async move {
            let query: Vec<(&str, String)> = query
                .iter()
                .map(|(name, value)| (name.as_str(), value.clone()))
                .collect();
            let value = client
                .get_json(&endpoint, &query)
                .await
                .map_err(BoxError::from)?;
            Ok::<_, BoxError>(SearchResponse::from_json(value))
        })
    }
}

impl<T> fmt::Debug for RestSearchSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestSearchSource")
            .field("base_url", &self.client.base_url())
            .field("endpoint", &self.endpoint)
            .field("term_param", &self.term_param)
            .field("limit", &self.limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_layout() {
        let client = RestClient::builder("https://erp.example.com").build().unwrap();
        let source = RestSearchSource::<serde_json::Value>::new(client, "/parts/search")
            .term_param("term")
            .limit(15)
            .param("active", "true");

        assert_eq!(
            source.query("ab"),
            vec![
                ("term".to_string(), "ab".to_string()),
                ("limit".to_string(), "15".to_string()),
                ("active".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_without_limit() {
        let client = RestClient::builder("https://erp.example.com").build().unwrap();
        let source = RestSearchSource::<serde_json::Value>::new(client, "/steps");
        assert_eq!(source.query("x"), vec![("q".to_string(), "x".to_string())]);
    }
}
