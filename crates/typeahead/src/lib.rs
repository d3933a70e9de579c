//! Asynchronous typeahead for single-line text fields.
//!
//! [`attach`] connects a suggestion panel to any host [`TextField`]. As the
//! user types, the term is debounced and handed to a caller-supplied search
//! function; results are rendered into a floating overlay positioned below the
//! field, navigated with the arrow keys or the pointer, and committed with
//! Enter or a click.
//!
//! Out-of-order responses are never shown: each new search cancels the
//! previous one, and a result is only applied if its term is still the most
//! recent one issued.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use typeahead::headless::{HeadlessField, HeadlessOverlayHost};
//! use typeahead::{Rect, TypeaheadConfig, attach};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> typeahead::Result<()> {
//! let field = HeadlessField::new(Rect::new(10.0, 10.0, 200.0, 24.0));
//! let host = HeadlessOverlayHost::new();
//!
//! let handle = attach(
//!     field.clone(),
//!     host.clone(),
//!     TypeaheadConfig::<String>::new()
//!         .fetch_items(|term: String| async move {
//!             Ok::<_, std::io::Error>(vec![format!("{term} one"), format!("{term} two")])
//!         })
//!         .display_value(|item: &String| item.clone())
//!         .on_pick(|item: &String| println!("picked {item}")),
//! )?;
//!
//! field.type_text("ab");
//! // ... later
//! handle.destroy();
//! # Ok(())
//! # }
//! ```

pub mod attach;
pub mod config;
pub mod error;
pub mod field;
pub mod headless;
pub mod interaction;
pub mod overlay;
pub mod render;
pub mod search;

pub use attach::{Detacher, TypeaheadHandle, attach};
pub use config::{TypeaheadConfig, TypeaheadOptions};
pub use error::{Result, TypeaheadError};
pub use field::{FieldKind, FieldSignals, Key, KeyPressEvent, KeyboardModifiers, TextField};
pub use interaction::InteractionState;
pub use overlay::{
    OVERLAY_GAP, OverlayHost, OverlayStyle, OverlaySurface, Row, RowEvent, ViewportSignals,
};
pub use render::{RowMarkup, escape_markup};
pub use search::{SearchFuture, SearchResponse, SearchSource};
pub use typeahead_core::{BoxError, Rect, Signal};
