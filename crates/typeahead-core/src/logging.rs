//! Logging facilities for typeahead crates.
//!
//! All crates in the workspace log through the `tracing` crate. To see logs,
//! install a subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("typeahead=debug,typeahead_rest=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "typeahead_core::signal";
    /// Deferred task target.
    pub const TASK: &str = "typeahead_core::task";
    /// Attach/detach lifecycle target.
    pub const ATTACH: &str = "typeahead::attach";
    /// Debounced search pipeline target.
    pub const SEARCH: &str = "typeahead::search";
    /// Overlay surface management target.
    pub const OVERLAY: &str = "typeahead::overlay";
    /// Keyboard and pointer interaction target.
    pub const INTERACTION: &str = "typeahead::interaction";
    /// REST search source target.
    pub const REST: &str = "typeahead_rest";
}

/// Span names used for tracing.
pub mod span_names {
    /// One search attempt, from issue to apply/discard.
    pub const SEARCH: &str = "typeahead::search";
    /// One HTTP request made by a REST search source.
    pub const REST_REQUEST: &str = "typeahead_rest::request";
}
