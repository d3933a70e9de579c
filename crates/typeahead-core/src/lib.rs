//! Core primitives for typeahead fields.
//!
//! This crate provides the building blocks the `typeahead` controller is made
//! of, none of which know anything about suggestions:
//!
//! - **Signals**: Type-safe host-to-controller notifications
//! - **Tasks**: Cancellation tokens and delayed, cancellable work on Tokio
//! - **Geometry**: Points, sizes and rectangles for anchoring overlays
//! - **Logging**: `tracing` targets shared across the workspace
//!
//! # Signal Example
//!
//! ```
//! use typeahead_core::Signal;
//!
//! let focus_out = Signal::<()>::new();
//! let id = focus_out.connect(|_| println!("field lost focus"));
//! focus_out.emit(());
//! focus_out.disconnect(id);
//! ```

pub mod geometry;
pub mod logging;
pub mod signal;
pub mod task;

pub use geometry::{Point, Rect, Size};
pub use signal::{ConnectionId, Signal};
pub use task::{CancellationToken, run_until_cancelled, spawn_delayed};

/// Boxed error type for failures raised by caller-supplied code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
