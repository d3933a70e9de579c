//! Search sources and response normalization.
//!
//! A typeahead calls its search function with the trimmed term and awaits a
//! [`SearchResponse`]. Back ends answer either with a bare list of items or
//! with an envelope object carrying an `items` list; both are accepted, and
//! anything else counts as "no matches" rather than as a failure.

use std::future::Future;

use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use typeahead_core::BoxError;

/// The future returned by a search function.
pub type SearchFuture<T> = BoxFuture<'static, Result<SearchResponse<T>, BoxError>>;

/// A search result as returned by a back end.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse<T> {
    /// A bare list of items.
    List(Vec<T>),
    /// An envelope object; a missing `items` field means no items.
    Envelope {
        #[serde(default = "Vec::new")]
        items: Vec<T>,
    },
    /// Anything else.
    Malformed(IgnoredAny),
}

impl<T> SearchResponse<T> {
    /// The items this response carries, in result order.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::List(items) | Self::Envelope { items } => items,
            Self::Malformed(_) => Vec::new(),
        }
    }

    /// Whether the response had an unrecognized shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl<T: DeserializeOwned> SearchResponse<T> {
    /// Normalize a JSON document into a response.
    ///
    /// Never fails: documents that are neither a list of `T` nor an object
    /// with an `items` list of `T` become [`SearchResponse::Malformed`].
    pub fn from_json(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or(Self::Malformed(IgnoredAny))
    }
}

impl<T> From<Vec<T>> for SearchResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self::List(items)
    }
}

/// A reusable source of suggestions.
///
/// Implement this for search back ends that are shared between pickers.
/// One-off closures can be passed to
/// [`TypeaheadConfig::fetch_items`](crate::TypeaheadConfig::fetch_items)
/// instead.
pub trait SearchSource<T>: Send + Sync + 'static {
    /// Start a search for `term`.
    ///
    /// Dropping the returned future must be safe; it is how superseded
    /// searches are cancelled.
    fn search(&self, term: &str) -> SearchFuture<T>;
}

pub(crate) type FetchFn<T> = std::sync::Arc<dyn Fn(String) -> SearchFuture<T> + Send + Sync>;

/// Wrap a closure returning any list-like result into a [`FetchFn`].
pub(crate) fn fetch_fn<T, F, Fut, R, E>(f: F) -> FetchFn<T>
where
    T: 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Into<SearchResponse<T>>,
    E: Into<BoxError>,
{
    std::sync::Arc::new(move |term: String| -> SearchFuture<T> {
        let fut = f(term);
        Box::pin(async move {
            let result: Result<SearchResponse<T>, BoxError> =
                fut.await.map(Into::into).map_err(Into::into);
            result
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Part {
        id: u32,
        code: String,
    }

    #[test]
    fn test_bare_list() {
        let response = SearchResponse::<Part>::from_json(json!([{"id": 1, "code": "AB"}]));
        assert_eq!(
            response.into_items(),
            vec![Part {
                id: 1,
                code: "AB".into()
            }]
        );
    }

    #[test]
    fn test_envelope() {
        let response = SearchResponse::<Part>::from_json(json!({
            "items": [{"id": 2, "code": "CD"}],
            "total": 1
        }));
        assert!(!response.is_malformed());
        assert_eq!(response.into_items().len(), 1);
    }

    #[test]
    fn test_envelope_without_items_is_empty() {
        let response = SearchResponse::<Part>::from_json(json!({"total": 0}));
        assert!(response.into_items().is_empty());
    }

    #[test]
    fn test_malformed_responses_are_empty() {
        for value in [json!("oops"), json!(42), json!(null), json!([1, 2])] {
            let response = SearchResponse::<Part>::from_json(value);
            assert!(response.is_malformed());
            assert!(response.into_items().is_empty());
        }
    }

    #[tokio::test]
    async fn test_fetch_fn_accepts_vec_results() {
        let fetch: FetchFn<u32> = fetch_fn(|term: String| async move {
            Ok::<_, std::io::Error>(vec![term.len() as u32])
        });
        let items = fetch("abc".to_string()).await.unwrap().into_items();
        assert_eq!(items, vec![3]);
    }
}
