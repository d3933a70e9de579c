//! Error types for typeahead attachments.

use typeahead_core::BoxError;

use crate::field::FieldKind;

/// The error type for typeahead operations.
///
/// Configuration problems (`InvalidField`, `MissingCallback`, `NoRuntime`,
/// `Options`) are returned synchronously from [`attach`](crate::attach) or
/// from option parsing. `Search` is never returned to a caller; it is handed
/// to the attachment's `on_error` callback.
#[derive(Debug, thiserror::Error)]
pub enum TypeaheadError {
    /// The field is not a single-line text control.
    #[error("typeahead requires a single-line text field, got {0:?}")]
    InvalidField(FieldKind),

    /// A required callback was not supplied.
    #[error("typeahead config is missing required callback `{0}`")]
    MissingCallback(&'static str),

    /// `attach` was called outside a Tokio runtime context.
    #[error("typeahead must be attached from within a Tokio runtime")]
    NoRuntime,

    /// Options could not be parsed.
    #[error("invalid typeahead options: {0}")]
    Options(#[from] toml::de::Error),

    /// The search function failed for `term`.
    #[error("search for {term:?} failed: {source}")]
    Search {
        /// The trimmed term that was searched.
        term: String,
        /// The failure reported by the search function.
        #[source]
        source: BoxError,
    },
}

/// A specialized Result type for typeahead operations.
pub type Result<T> = std::result::Result<T, TypeaheadError>;
