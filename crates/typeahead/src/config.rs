//! Typeahead configuration.
//!
//! [`TypeaheadOptions`] holds the plain-data tunables and can be loaded from
//! TOML; [`TypeaheadConfig`] adds the caller's callbacks. Both are consumed by
//! [`attach`](crate::attach) and are immutable for the life of the attachment.
//!
//! # Example
//!
//! ```
//! use typeahead::{TypeaheadConfig, TypeaheadOptions};
//!
//! let options = TypeaheadOptions::from_toml_str("min_chars = 2\ndebounce_ms = 150").unwrap();
//!
//! let config = TypeaheadConfig::<String>::new()
//!     .fetch_items(|term: String| async move {
//!         Ok::<_, std::io::Error>(vec![format!("{term}1"), format!("{term}2")])
//!     })
//!     .display_value(|item: &String| item.clone())
//!     .on_pick(|item: &String| println!("picked {item}"))
//!     .options(options);
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use typeahead_core::BoxError;
use typeahead_core::logging::targets;

use crate::error::{Result, TypeaheadError};
use crate::overlay::OverlayStyle;
use crate::render::RowMarkup;
use crate::search::{FetchFn, SearchResponse, SearchSource, fetch_fn};

/// Plain-data tunables of a typeahead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeaheadOptions {
    /// Search immediately with the current value when the field gains focus.
    pub open_on_focus: bool,
    /// Minimum trimmed term length (in characters) that triggers a search.
    pub min_chars: usize,
    /// Quiet period after the last edit before searching, in milliseconds.
    pub debounce_ms: u64,
    /// Maximum panel height in pixels.
    pub max_height: f32,
    /// Panel stacking order.
    pub z_index: i32,
    /// Delay between losing focus and closing the panel, in milliseconds.
    pub blur_grace_ms: u64,
    /// Label of the row shown when a search matched nothing.
    pub empty_label: String,
}

impl Default for TypeaheadOptions {
    fn default() -> Self {
        Self {
            open_on_focus: false,
            min_chars: 1,
            debounce_ms: 200,
            max_height: 280.0,
            z_index: 1000,
            blur_grace_ms: 80,
            empty_label: "No matches".to_string(),
        }
    }
}

impl TypeaheadOptions {
    /// Parse options from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// The debounce period.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The blur grace period.
    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }

    pub(crate) fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            max_height: self.max_height,
            z_index: self.z_index,
        }
    }
}

pub(crate) type DisplayFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
pub(crate) type RenderFn<T> = Arc<dyn Fn(&T) -> RowMarkup + Send + Sync>;
pub(crate) type PickFn<T> = Arc<dyn Fn(&T) + Send + Sync>;
pub(crate) type ErrorFn = Arc<dyn Fn(&TypeaheadError) + Send + Sync>;

/// Callbacks and options for one typeahead attachment.
///
/// `fetch_items` (or `search_source`) and `display_value` are required;
/// [`attach`](crate::attach) fails with
/// [`TypeaheadError::MissingCallback`] without them.
pub struct TypeaheadConfig<T> {
    fetch_items: Option<FetchFn<T>>,
    display_value: Option<DisplayFn<T>>,
    render_item: Option<RenderFn<T>>,
    on_pick: Option<PickFn<T>>,
    on_error: Option<ErrorFn>,
    options: TypeaheadOptions,
}

impl<T: 'static> Default for TypeaheadConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> TypeaheadConfig<T> {
    /// Create a config with no callbacks and default options.
    pub fn new() -> Self {
        Self {
            fetch_items: None,
            display_value: None,
            render_item: None,
            on_pick: None,
            on_error: None,
            options: TypeaheadOptions::default(),
        }
    }

    /// Set the search function.
    ///
    /// It receives the trimmed term and resolves to a list of items or to a
    /// [`SearchResponse`].
    pub fn fetch_items<F, Fut, R, E>(mut self, fetch: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
        R: Into<SearchResponse<T>>,
        E: Into<BoxError>,
    {
        self.fetch_items = Some(fetch_fn(fetch));
        self
    }

    /// Use a shared [`SearchSource`] as the search function.
    pub fn search_source<S: SearchSource<T>>(mut self, source: S) -> Self {
        let source = Arc::new(source);
        self.fetch_items = Some(Arc::new(move |term: String| source.search(&term)));
        self
    }

    /// Set the formatter that produces the text written into the field.
    pub fn display_value<F>(mut self, display: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.display_value = Some(Arc::new(display));
        self
    }

    /// Set the row renderer. Defaults to the escaped display value.
    pub fn render_item<F>(mut self, render: F) -> Self
    where
        F: Fn(&T) -> RowMarkup + Send + Sync + 'static,
    {
        self.render_item = Some(Arc::new(render));
        self
    }

    /// Set the callback invoked after an item is committed.
    pub fn on_pick<F>(mut self, on_pick: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_pick = Some(Arc::new(on_pick));
        self
    }

    /// Set the callback that receives search failures. Defaults to logging.
    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&TypeaheadError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    /// Replace all options.
    pub fn options(mut self, options: TypeaheadOptions) -> Self {
        self.options = options;
        self
    }

    /// Search on focus.
    pub fn open_on_focus(mut self, enabled: bool) -> Self {
        self.options.open_on_focus = enabled;
        self
    }

    /// Set the minimum term length.
    pub fn min_chars(mut self, count: usize) -> Self {
        self.options.min_chars = count;
        self
    }

    /// Set the debounce period in milliseconds.
    pub fn debounce_ms(mut self, millis: u64) -> Self {
        self.options.debounce_ms = millis;
        self
    }

    /// Set the maximum panel height.
    pub fn max_height(mut self, height: f32) -> Self {
        self.options.max_height = height;
        self
    }

    /// Set the panel stacking order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.options.z_index = z_index;
        self
    }

    /// Set the blur grace period in milliseconds.
    pub fn blur_grace_ms(mut self, millis: u64) -> Self {
        self.options.blur_grace_ms = millis;
        self
    }

    /// Set the empty-state label.
    pub fn empty_label(mut self, label: impl Into<String>) -> Self {
        self.options.empty_label = label.into();
        self
    }

    /// Check required callbacks and fill in defaults.
    pub(crate) fn resolve(self) -> Result<ResolvedConfig<T>> {
        let fetch_items = self
            .fetch_items
            .ok_or(TypeaheadError::MissingCallback("fetch_items"))?;
        let display_value = self
            .display_value
            .ok_or(TypeaheadError::MissingCallback("display_value"))?;

        let render_item: RenderFn<T> = match self.render_item {
            Some(render) => render,
            None => {
                let display = display_value.clone();
                Arc::new(move |item: &T| RowMarkup::escaped(&display(item)))
            }
        };
        let on_pick: PickFn<T> = match self.on_pick {
            Some(on_pick) => on_pick,
            None => Arc::new(|_: &T| {}),
        };
        let on_error: ErrorFn = match self.on_error {
            Some(on_error) => on_error,
            None => Arc::new(|err: &TypeaheadError| {
                tracing::warn!(target: targets::SEARCH, error = %err, "typeahead search failed");
            }),
        };

        Ok(ResolvedConfig {
            fetch_items,
            display_value,
            render_item,
            on_pick,
            on_error,
            options: self.options,
        })
    }
}

impl<T> fmt::Debug for TypeaheadConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeaheadConfig")
            .field("fetch_items", &self.fetch_items.is_some())
            .field("display_value", &self.display_value.is_some())
            .field("render_item", &self.render_item.is_some())
            .field("on_pick", &self.on_pick.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// A config with every callback present.
pub(crate) struct ResolvedConfig<T> {
    pub(crate) fetch_items: FetchFn<T>,
    pub(crate) display_value: DisplayFn<T>,
    pub(crate) render_item: RenderFn<T>,
    pub(crate) on_pick: PickFn<T>,
    pub(crate) on_error: ErrorFn,
    pub(crate) options: TypeaheadOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TypeaheadOptions::default();
        assert!(!options.open_on_focus);
        assert_eq!(options.min_chars, 1);
        assert_eq!(options.debounce(), Duration::from_millis(200));
        assert_eq!(options.max_height, 280.0);
        assert_eq!(options.z_index, 1000);
        assert_eq!(options.blur_grace(), Duration::from_millis(80));
    }

    #[test]
    fn test_options_from_partial_toml() {
        let options = TypeaheadOptions::from_toml_str(
            r#"
            open_on_focus = true
            min_chars = 0
            empty_label = "Nothing found"
            "#,
        )
        .unwrap();

        assert!(options.open_on_focus);
        assert_eq!(options.min_chars, 0);
        assert_eq!(options.empty_label, "Nothing found");
        assert_eq!(options.debounce_ms, 200);
    }

    #[test]
    fn test_options_reject_wrong_types() {
        let err = TypeaheadOptions::from_toml_str("min_chars = \"two\"").unwrap_err();
        assert!(matches!(err, TypeaheadError::Options(_)));
    }

    #[test]
    fn test_missing_fetch_items() {
        let config = TypeaheadConfig::<String>::new().display_value(|s: &String| s.clone());
        assert!(matches!(
            config.resolve(),
            Err(TypeaheadError::MissingCallback("fetch_items"))
        ));
    }

    #[test]
    fn test_missing_display_value() {
        let config = TypeaheadConfig::<String>::new()
            .fetch_items(|_term: String| async { Ok::<_, BoxError>(Vec::<String>::new()) });
        assert!(matches!(
            config.resolve(),
            Err(TypeaheadError::MissingCallback("display_value"))
        ));
    }

    #[test]
    fn test_default_renderer_escapes_display_value() {
        let config = TypeaheadConfig::<String>::new()
            .fetch_items(|_term: String| async { Ok::<_, BoxError>(Vec::<String>::new()) })
            .display_value(|s: &String| format!("<{s}>"))
            .resolve()
            .unwrap();

        let markup = (config.render_item)(&"x".to_string());
        assert_eq!(markup.as_str(), "&lt;x&gt;");
    }
}
