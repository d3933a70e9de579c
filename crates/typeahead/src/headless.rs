//! In-memory host implementation.
//!
//! [`HeadlessField`] and [`HeadlessOverlayHost`] implement the host traits
//! without any toolkit behind them. They record what the typeahead asked for
//! and let callers simulate user activity, which makes them suitable for
//! tests and for driving a typeahead from non-graphical front ends.

use std::sync::Arc;

use parking_lot::Mutex;
use typeahead_core::{Rect, Signal};

use crate::field::{FieldKind, FieldSignals, Key, KeyPressEvent, TextField};
use crate::overlay::{OverlayHost, OverlayStyle, OverlaySurface, Row, RowEvent, ViewportSignals};

/// A text field held entirely in memory.
#[derive(Debug)]
pub struct HeadlessField {
    kind: FieldKind,
    value: Mutex<String>,
    rect: Mutex<Rect>,
    signals: FieldSignals,
}

impl HeadlessField {
    /// Create a single-line field at `rect`.
    pub fn new(rect: Rect) -> Arc<Self> {
        Self::with_kind(FieldKind::SingleLine, rect)
    }

    /// Create a field of any kind.
    pub fn with_kind(kind: FieldKind, rect: Rect) -> Arc<Self> {
        Arc::new(Self {
            kind,
            value: Mutex::new(String::new()),
            rect: Mutex::new(rect),
            signals: FieldSignals::new(),
        })
    }

    /// Simulate the user replacing the text with `text`.
    pub fn type_text(&self, text: &str) {
        *self.value.lock() = text.to_string();
        self.signals.text_edited.emit(text.to_string());
    }

    /// Simulate the field gaining focus.
    pub fn focus(&self) {
        self.signals.focus_in.emit(());
    }

    /// Simulate the field losing focus.
    pub fn blur(&self) {
        self.signals.focus_out.emit(());
    }

    /// Simulate a key press. Returns whether a listener consumed it.
    pub fn press_key(&self, key: Key) -> bool {
        let event = Arc::new(KeyPressEvent::new(key));
        self.signals.key_pressed.emit(event.clone());
        event.is_accepted()
    }

    /// Move the field, as if the page scrolled under it.
    pub fn set_rect(&self, rect: Rect) {
        *self.rect.lock() = rect;
    }
}

impl TextField for HeadlessField {
    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn value(&self) -> String {
        self.value.lock().clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.lock() = value.to_string();
    }

    fn anchor_rect(&self) -> Rect {
        *self.rect.lock()
    }

    fn signals(&self) -> &FieldSignals {
        &self.signals
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    rows: Vec<Row>,
    active: Vec<usize>,
    placement: Option<Rect>,
    visible: bool,
    destroyed: bool,
}

/// An overlay surface held in memory.
#[derive(Debug)]
pub struct HeadlessSurface {
    style: OverlayStyle,
    state: Mutex<SurfaceState>,
    row_events: Signal<RowEvent>,
}

impl HeadlessSurface {
    fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            state: Mutex::new(SurfaceState::default()),
            row_events: Signal::new(),
        }
    }

    /// The style the surface was created with.
    pub fn style(&self) -> OverlayStyle {
        self.style
    }

    /// The rows currently shown.
    pub fn rows(&self) -> Vec<Row> {
        self.state.lock().rows.clone()
    }

    /// The markup of every item row, in order.
    pub fn row_markup(&self) -> Vec<String> {
        self.state
            .lock()
            .rows
            .iter()
            .filter_map(|row| match row {
                Row::Item { markup, .. } => Some(markup.as_str().to_string()),
                Row::Empty { .. } => None,
            })
            .collect()
    }

    /// Rows currently styled active, ascending.
    pub fn active_rows(&self) -> Vec<usize> {
        let mut active = self.state.lock().active.clone();
        active.sort_unstable();
        active
    }

    /// Where the surface was last placed.
    pub fn placement(&self) -> Option<Rect> {
        self.state.lock().placement
    }

    /// Whether the surface is visible.
    pub fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    /// Whether the surface was destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }

    /// Simulate the pointer entering row `index`.
    pub fn hover(&self, index: usize) {
        self.row_events.emit(RowEvent::Entered(index));
    }

    /// Simulate the pointer leaving row `index`.
    pub fn leave(&self, index: usize) {
        self.row_events.emit(RowEvent::Left(index));
    }

    /// Simulate a pointer press on row `index`.
    pub fn press(&self, index: usize) {
        self.row_events.emit(RowEvent::Pressed(index));
    }
}

impl OverlaySurface for HeadlessSurface {
    fn place(&self, rect: Rect) {
        self.state.lock().placement = Some(rect);
    }

    fn set_rows(&self, rows: Vec<Row>) {
        let mut state = self.state.lock();
        state.rows = rows;
        state.active.clear();
    }

    fn set_row_active(&self, index: usize, active: bool) {
        let mut state = self.state.lock();
        state.active.retain(|&i| i != index);
        if active {
            state.active.push(index);
        }
    }

    fn clear(&self) {
        let mut state = self.state.lock();
        state.rows.clear();
        state.active.clear();
    }

    fn show(&self) {
        self.state.lock().visible = true;
    }

    fn hide(&self) {
        self.state.lock().visible = false;
    }

    fn destroy(&self) {
        let mut state = self.state.lock();
        state.rows.clear();
        state.active.clear();
        state.visible = false;
        state.destroyed = true;
    }

    fn row_events(&self) -> &Signal<RowEvent> {
        &self.row_events
    }
}

/// An overlay host that keeps every surface it creates.
#[derive(Debug, Default)]
pub struct HeadlessOverlayHost {
    surfaces: Mutex<Vec<Arc<HeadlessSurface>>>,
    viewport: ViewportSignals,
}

impl HeadlessOverlayHost {
    /// Create a host with no surfaces.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every surface created so far.
    pub fn surfaces(&self) -> Vec<Arc<HeadlessSurface>> {
        self.surfaces.lock().clone()
    }

    /// The most recently created surface.
    pub fn surface(&self) -> Option<Arc<HeadlessSurface>> {
        self.surfaces.lock().last().cloned()
    }

    /// Simulate the viewport scrolling.
    pub fn scroll(&self) {
        self.viewport.scrolled.emit(());
    }

    /// Simulate the viewport being resized.
    pub fn resize(&self) {
        self.viewport.resized.emit(());
    }
}

impl OverlayHost for HeadlessOverlayHost {
    fn create_overlay(&self, style: OverlayStyle) -> Arc<dyn OverlaySurface> {
        let surface = Arc::new(HeadlessSurface::new(style));
        self.surfaces.lock().push(surface.clone());
        surface
    }

    fn viewport(&self) -> &ViewportSignals {
        &self.viewport
    }
}
