//! Overlay surfaces: the floating suggestion panel.
//!
//! The host toolkit supplies the panel through two traits:
//!
//! - [`OverlayHost`] creates surfaces and reports viewport scrolling/resizing.
//! - [`OverlaySurface`] is one panel: it is placed, filled with rows, shown,
//!   hidden and finally destroyed. It reports pointer activity on its rows
//!   through [`OverlaySurface::row_events`].
//!
//! [`OverlayManager`] owns the single surface of one attachment. It creates
//! the surface lazily, keeps it anchored below the field and enforces that the
//! panel is only ever visible while it has rows.

use std::fmt;
use std::sync::Arc;

use typeahead_core::logging::targets;
use typeahead_core::{ConnectionId, Rect, Signal};

use crate::render::RowMarkup;

/// Vertical gap between the field and the panel, in pixels.
pub const OVERLAY_GAP: f32 = 2.0;

/// Static presentation parameters for a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    /// Upper bound for the panel height; content beyond it scrolls.
    pub max_height: f32,
    /// Stacking order relative to other floating UI.
    pub z_index: i32,
}

/// One row of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// A suggestion. `index` is the item's position in the result list.
    Item { index: usize, markup: RowMarkup },
    /// The non-interactive row shown when a search matched nothing.
    Empty { label: String },
}

impl Row {
    /// Whether the row reacts to hover and press.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Item { .. })
    }
}

/// Pointer activity on a panel row, reported by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEvent {
    /// The pointer moved onto row `i`.
    Entered(usize),
    /// The pointer left row `i`.
    Left(usize),
    /// A pointer button went down on row `i`.
    ///
    /// Surfaces emit this before the field sees any focus change caused by
    /// the press.
    Pressed(usize),
}

/// Viewport notifications used to keep panels anchored.
#[derive(Debug, Default)]
pub struct ViewportSignals {
    /// The viewport or any scrollable ancestor of a field scrolled.
    pub scrolled: Signal<()>,
    /// The viewport was resized.
    pub resized: Signal<()>,
}

impl ViewportSignals {
    /// Create a set of signals with no connections.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A floating panel created by the host.
///
/// Surfaces must not emit [`row_events`](Self::row_events) from inside their
/// own methods.
pub trait OverlaySurface: Send + Sync {
    /// Move and size the panel. `rect.height()` is the maximum height.
    fn place(&self, rect: Rect);

    /// Replace the panel's rows.
    fn set_rows(&self, rows: Vec<Row>);

    /// Mark row `index` as the active row, or clear that mark.
    fn set_row_active(&self, index: usize, active: bool);

    /// Remove all rows.
    fn clear(&self);

    /// Make the panel visible.
    fn show(&self);

    /// Make the panel invisible.
    fn hide(&self);

    /// Release the panel. No other method is called afterwards.
    fn destroy(&self);

    /// Pointer activity on the panel's rows.
    fn row_events(&self) -> &Signal<RowEvent>;
}

/// The host capability that creates overlay surfaces.
pub trait OverlayHost: Send + Sync {
    /// Create a new, hidden, empty surface.
    fn create_overlay(&self, style: OverlayStyle) -> Arc<dyn OverlaySurface>;

    /// Viewport notifications.
    fn viewport(&self) -> &ViewportSignals;
}

pub(crate) type RowSlot = Arc<dyn Fn(&RowEvent) + Send + Sync>;

/// Manages the single overlay surface of one attachment.
pub(crate) struct OverlayManager {
    host: Arc<dyn OverlayHost>,
    style: OverlayStyle,
    row_slot: RowSlot,
    surface: Option<Arc<dyn OverlaySurface>>,
    row_connection: Option<ConnectionId>,
    has_content: bool,
    visible: bool,
}

impl OverlayManager {
    pub(crate) fn new(host: Arc<dyn OverlayHost>, style: OverlayStyle, row_slot: RowSlot) -> Self {
        Self {
            host,
            style,
            row_slot,
            surface: None,
            row_connection: None,
            has_content: false,
            visible: false,
        }
    }

    /// Whether the surface has been created.
    pub(crate) fn is_created(&self) -> bool {
        self.surface.is_some()
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visible
    }

    fn surface(&mut self) -> &Arc<dyn OverlaySurface> {
        let host = &self.host;
        let style = self.style;
        let row_slot = &self.row_slot;
        let row_connection = &mut self.row_connection;
        self.surface.get_or_insert_with(|| {
            tracing::debug!(target: targets::OVERLAY, ?style, "creating overlay surface");
            let surface = host.create_overlay(style);
            let slot = row_slot.clone();
            *row_connection = Some(surface.row_events().connect(move |event| slot(event)));
            surface
        })
    }

    fn placement(&self, anchor: Rect) -> Rect {
        anchor.below(OVERLAY_GAP, self.style.max_height)
    }

    /// Replace the panel content with `rows` and show it below `anchor`.
    pub(crate) fn paint(&mut self, rows: Vec<Row>, anchor: Rect) {
        self.has_content = !rows.is_empty();
        self.surface().set_rows(rows);
        self.show(anchor);
    }

    /// Show the panel below `anchor` if it has content.
    ///
    /// Returns whether the panel is visible afterwards.
    pub(crate) fn show(&mut self, anchor: Rect) -> bool {
        if !self.has_content {
            return false;
        }
        let rect = self.placement(anchor);
        let surface = self.surface();
        surface.place(rect);
        surface.show();
        self.visible = true;
        true
    }

    /// Clear the panel content and hide it.
    pub(crate) fn hide(&mut self) {
        if let Some(surface) = &self.surface {
            surface.clear();
            surface.hide();
        }
        self.has_content = false;
        self.visible = false;
    }

    /// Re-anchor a visible panel after the viewport changed.
    pub(crate) fn reposition(&self, anchor: Rect) {
        if !self.visible {
            return;
        }
        if let Some(surface) = &self.surface {
            surface.place(self.placement(anchor));
        }
    }

    /// Restyle a single row.
    pub(crate) fn set_row_active(&self, index: usize, active: bool) {
        if let Some(surface) = &self.surface {
            surface.set_row_active(index, active);
        }
    }

    /// Disconnect from the surface and release it.
    pub(crate) fn destroy(&mut self) {
        if let Some(surface) = self.surface.take() {
            if let Some(id) = self.row_connection.take() {
                surface.row_events().disconnect(id);
            }
            surface.destroy();
            tracing::debug!(target: targets::OVERLAY, "overlay surface destroyed");
        }
        self.has_content = false;
        self.visible = false;
    }
}

impl fmt::Debug for OverlayManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayManager")
            .field("style", &self.style)
            .field("created", &self.surface.is_some())
            .field("has_content", &self.has_content)
            .field("visible", &self.visible)
            .finish()
    }
}
