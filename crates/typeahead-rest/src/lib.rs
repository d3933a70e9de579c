//! REST-backed search sources for typeahead fields.
//!
//! This crate connects [`typeahead`] to JSON search endpoints:
//!
//! - [`RestClient`]: base URL, bearer auth and timeout around `reqwest`
//! - [`RestSearchSource`]: a [`typeahead::SearchSource`] issuing
//!   `GET {endpoint}?q={term}&limit={n}`
//! - [`EntityKind`] and [`entity_picker`]: ready-made pickers for the
//!   customers, parts, materials, suppliers, employees and steps endpoints
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use typeahead::headless::{HeadlessField, HeadlessOverlayHost};
//! use typeahead::{Rect, attach};
//! use typeahead_rest::{EntityKind, RestClient, entity_picker};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestClient::builder("https://erp.example.com/api").build()?;
//! let field = HeadlessField::new(Rect::new(0.0, 0.0, 240.0, 24.0));
//!
//! let picker = entity_picker(&client, EntityKind::Parts)
//!     .on_pick(|part: &serde_json::Value| println!("picked {}", part["id"]));
//! let handle = attach(field, HeadlessOverlayHost::new(), picker)?;
//! # drop(handle);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod pickers;
pub mod source;

pub use client::{RestClient, RestClientBuilder};
pub use error::{RestError, Result};
pub use pickers::{EntityKind, PickerSettings, display_record, entity_picker};
pub use source::RestSearchSource;
