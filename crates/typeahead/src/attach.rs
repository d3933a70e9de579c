//! The attachment controller.
//!
//! [`attach`] turns a [`TextField`] into a typeahead: it connects to the
//! field's signals, debounces edits into searches, paints results into a lazily
//! created overlay surface and reacts to keys and pointer activity until the
//! returned [`TypeaheadHandle`] is destroyed.
//!
//! # Concurrency
//!
//! Timers and searches run as tasks on the Tokio runtime that was current when
//! `attach` was called. Session state sits behind a single mutex that is never
//! held while caller code (`fetch_items`, `display_value`, `render_item`,
//! `on_pick`, `on_error`) runs, so callbacks may call back into the handle,
//! including destroying it.
//!
//! A search result is applied only if the session is alive and the result's
//! term is still the most recently issued one. Issuing a new search also
//! cancels the previous in-flight one, which drops its future.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::Instrument;
use typeahead_core::logging::{span_names, targets};
use typeahead_core::{BoxError, CancellationToken, ConnectionId, run_until_cancelled, spawn_delayed};

use crate::config::{ResolvedConfig, TypeaheadConfig};
use crate::error::{Result, TypeaheadError};
use crate::field::{KeyPressEvent, TextField};
use crate::interaction::{HighlightChange, Interaction, InteractionState, KeyAction};
use crate::overlay::{OverlayHost, OverlayManager, RowEvent, RowSlot};
use crate::render::render_rows;
use crate::search::SearchResponse;

/// A listener the attachment registered on a host signal.
#[derive(Debug, Clone, Copy)]
enum Listener {
    TextEdited,
    FocusIn,
    FocusOut,
    KeyPressed,
    Scrolled,
    Resized,
}

/// Mutable per-attachment state.
struct Session<T> {
    items: Vec<T>,
    interaction: Interaction,
    last_query: Option<String>,
    pending_term: String,
    destroyed: bool,
    overlay: OverlayManager,
    debounce: Option<CancellationToken>,
    in_flight: Option<CancellationToken>,
    blur_close: Option<CancellationToken>,
    press_in_progress: bool,
    connections: Vec<(Listener, ConnectionId)>,
}

impl<T> Session<T> {
    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    fn cancel_blur_close(&mut self) {
        if let Some(token) = self.blur_close.take() {
            token.cancel();
        }
    }

    fn cancel_all(&mut self) {
        if let Some(token) = self.debounce.take() {
            token.cancel();
        }
        self.cancel_in_flight();
        self.cancel_blur_close();
    }

    /// Hide the panel and forget its items.
    fn close(&mut self) {
        self.items.clear();
        self.interaction.close();
        self.overlay.hide();
    }

    fn restyle(&self, change: HighlightChange) {
        if let Some(previous) = change.previous {
            self.overlay.set_row_active(previous, false);
        }
        if let Some(current) = change.current {
            self.overlay.set_row_active(current, true);
        }
    }

    /// First half of a commit: take the item out and stop reacting to the old rows.
    fn begin_commit(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = std::mem::take(&mut self.items).into_iter().nth(index);
        self.interaction.close();
        item
    }
}

struct Inner<T> {
    config: ResolvedConfig<T>,
    field: Arc<dyn TextField>,
    host: Arc<dyn OverlayHost>,
    runtime: Handle,
    session: Mutex<Session<T>>,
}

/// Attach a typeahead to `field`, drawing its panel through `host`.
///
/// Must be called from within a Tokio runtime context; timers and searches
/// are spawned onto that runtime.
///
/// # Errors
///
/// - [`TypeaheadError::InvalidField`] if `field` is not a single-line text control
/// - [`TypeaheadError::MissingCallback`] if `fetch_items` or `display_value` is missing
/// - [`TypeaheadError::NoRuntime`] if no Tokio runtime is current
pub fn attach<T>(
    field: Arc<dyn TextField>,
    host: Arc<dyn OverlayHost>,
    config: TypeaheadConfig<T>,
) -> Result<TypeaheadHandle<T>>
where
    T: Clone + Send + Sync + 'static,
{
    let kind = field.kind();
    if !kind.accepts_typeahead() {
        return Err(TypeaheadError::InvalidField(kind));
    }
    let config = config.resolve()?;
    let runtime = Handle::try_current().map_err(|_| TypeaheadError::NoRuntime)?;

    let inner = Arc::new_cyclic(|weak: &Weak<Inner<T>>| {
        let weak = weak.clone();
        let row_slot: RowSlot = Arc::new(move |event: &RowEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.on_row_event(*event);
            }
        });
        let overlay = OverlayManager::new(host.clone(), config.options.overlay_style(), row_slot);

        Inner {
            config,
            field,
            host,
            runtime,
            session: Mutex::new(Session {
                items: Vec::new(),
                interaction: Interaction::new(),
                last_query: None,
                pending_term: String::new(),
                destroyed: false,
                overlay,
                debounce: None,
                in_flight: None,
                blur_close: None,
                press_in_progress: false,
                connections: Vec::new(),
            }),
        }
    });

    inner.connect_listeners();
    tracing::debug!(target: targets::ATTACH, field_kind = ?kind, "typeahead attached");

    Ok(TypeaheadHandle { inner })
}

impl<T> Inner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn connect_listeners(self: &Arc<Self>) {
        let signals = self.field.signals();
        let viewport = self.host.viewport();
        let mut connections = Vec::with_capacity(6);

        let weak = Arc::downgrade(self);
        connections.push((
            Listener::TextEdited,
            signals.text_edited.connect(move |text: &String| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_text_edited(text);
                }
            }),
        ));

        let weak = Arc::downgrade(self);
        connections.push((
            Listener::FocusIn,
            signals.focus_in.connect(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_focus_in();
                }
            }),
        ));

        let weak = Arc::downgrade(self);
        connections.push((
            Listener::FocusOut,
            signals.focus_out.connect(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_focus_out();
                }
            }),
        ));

        let weak = Arc::downgrade(self);
        connections.push((
            Listener::KeyPressed,
            signals.key_pressed.connect(move |event: &Arc<KeyPressEvent>| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_key(event);
                }
            }),
        ));

        let weak = Arc::downgrade(self);
        connections.push((
            Listener::Scrolled,
            viewport.scrolled.connect(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_viewport_changed();
                }
            }),
        ));

        let weak = Arc::downgrade(self);
        connections.push((
            Listener::Resized,
            viewport.resized.connect(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_viewport_changed();
                }
            }),
        ));

        self.session.lock().connections = connections;
    }

    fn disconnect(&self, listener: Listener, id: ConnectionId) {
        let signals = self.field.signals();
        let viewport = self.host.viewport();
        match listener {
            Listener::TextEdited => signals.text_edited.disconnect(id),
            Listener::FocusIn => signals.focus_in.disconnect(id),
            Listener::FocusOut => signals.focus_out.disconnect(id),
            Listener::KeyPressed => signals.key_pressed.disconnect(id),
            Listener::Scrolled => viewport.scrolled.disconnect(id),
            Listener::Resized => viewport.resized.disconnect(id),
        };
    }

    // =========================================================================
    // Debounced search
    // =========================================================================

    fn on_text_edited(self: &Arc<Self>, text: &str) {
        let token = {
            let mut session = self.session.lock();
            if session.destroyed {
                return;
            }
            session.press_in_progress = false;
            session.pending_term = text.to_string();
            if let Some(previous) = session.debounce.take() {
                previous.cancel();
            }
            let token = CancellationToken::new();
            session.debounce = Some(token.clone());
            token
        };

        let weak = Arc::downgrade(self);
        spawn_delayed(
            &self.runtime,
            self.config.options.debounce(),
            token.clone(),
            move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let term = {
                    let mut session = inner.session.lock();
                    if token.is_cancelled() {
                        return;
                    }
                    session.debounce = None;
                    session.pending_term.clone()
                };
                inner.search(&term);
            },
        );
    }

    /// Run the search pipeline for `raw`, bypassing the debounce timer.
    fn search(self: &Arc<Self>, raw: &str) {
        let term = raw.trim().to_string();

        let token = {
            let mut session = self.session.lock();
            if session.destroyed {
                return;
            }
            if term.chars().count() < self.config.options.min_chars {
                tracing::trace!(target: targets::SEARCH, %term, "term below min_chars, closing");
                session.cancel_in_flight();
                session.close();
                return;
            }
            session.last_query = Some(term.clone());
            session.cancel_in_flight();
            let token = CancellationToken::new();
            session.in_flight = Some(token.clone());
            token
        };

        tracing::debug!(target: targets::SEARCH, %term, "issuing search");
        let search = (self.config.fetch_items)(term.clone());
        let weak = Arc::downgrade(self);
        let span = tracing::debug_span!(target: targets::SEARCH, span_names::SEARCH, %term);

        self.runtime.spawn(
            async move {
                let Some(result) = run_until_cancelled(&token, search).await else {
                    tracing::trace!(target: targets::SEARCH, "search cancelled");
                    return;
                };
                if let Some(inner) = weak.upgrade() {
                    inner.apply(term, &token, result);
                }
            }
            .instrument(span),
        );
    }

    /// Whether a resolved search for `term` may still touch the session.
    fn is_current(session: &Session<T>, term: &str, token: &CancellationToken) -> bool {
        !session.destroyed
            && !token.is_cancelled()
            && session.last_query.as_deref() == Some(term)
    }

    fn apply(
        &self,
        term: String,
        token: &CancellationToken,
        result: std::result::Result<SearchResponse<T>, BoxError>,
    ) {
        let response = match result {
            Ok(response) => response,
            Err(source) => {
                {
                    let mut session = self.session.lock();
                    if session.destroyed || token.is_cancelled() {
                        return;
                    }
                    session.in_flight = None;
                }
                tracing::debug!(target: targets::SEARCH, %term, "search failed");
                (self.config.on_error)(&TypeaheadError::Search { term, source });
                return;
            }
        };

        if !Self::is_current(&self.session.lock(), &term, token) {
            tracing::trace!(target: targets::SEARCH, %term, "discarding stale result");
            return;
        }

        if response.is_malformed() {
            tracing::debug!(target: targets::SEARCH, %term, "malformed search response, treating as empty");
        }
        let items = response.into_items();
        let rows = render_rows(
            &items,
            self.config.render_item.as_ref(),
            &self.config.options.empty_label,
        );
        let anchor = self.field.anchor_rect();

        let mut session = self.session.lock();
        if !Self::is_current(&session, &term, token) {
            tracing::trace!(target: targets::SEARCH, %term, "discarding stale result");
            return;
        }
        tracing::debug!(target: targets::SEARCH, %term, count = items.len(), "applying search result");
        session.in_flight = None;
        session.interaction.open(items.len());
        session.items = items;
        session.overlay.paint(rows, anchor);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    fn on_focus_in(self: &Arc<Self>) {
        {
            let mut session = self.session.lock();
            if session.destroyed {
                return;
            }
            session.press_in_progress = false;
            session.cancel_blur_close();
        }
        if self.config.options.open_on_focus {
            let value = self.field.value();
            self.search(&value);
        }
    }

    fn on_focus_out(self: &Arc<Self>) {
        let token = {
            let mut session = self.session.lock();
            if session.destroyed {
                return;
            }
            if session.press_in_progress {
                tracing::trace!(target: targets::INTERACTION, "blur caused by row press, keeping panel");
                session.press_in_progress = false;
                return;
            }
            session.cancel_blur_close();
            let token = CancellationToken::new();
            session.blur_close = Some(token.clone());
            token
        };

        let weak = Arc::downgrade(self);
        spawn_delayed(
            &self.runtime,
            self.config.options.blur_grace(),
            token.clone(),
            move || {
                if let Some(inner) = weak.upgrade() {
                    let mut session = inner.session.lock();
                    if token.is_cancelled() || session.destroyed {
                        return;
                    }
                    session.blur_close = None;
                    session.cancel_in_flight();
                    session.close();
                }
            },
        );
    }

    // =========================================================================
    // Keyboard and pointer
    // =========================================================================

    fn on_key(&self, event: &KeyPressEvent) {
        let committed = {
            let mut session = self.session.lock();
            if session.destroyed {
                return;
            }
            session.press_in_progress = false;
            match session.interaction.on_key(event.key) {
                KeyAction::Highlight(change) => {
                    event.accept();
                    session.restyle(change);
                    None
                }
                KeyAction::Commit(index) => {
                    event.accept();
                    session.begin_commit(index)
                }
                KeyAction::Dismiss => {
                    event.accept();
                    session.close();
                    None
                }
                KeyAction::Consumed => {
                    event.accept();
                    None
                }
                KeyAction::Ignore => None,
            }
        };

        if let Some(item) = committed {
            self.finish_commit(item);
        }
    }

    fn on_row_event(&self, event: RowEvent) {
        let committed = {
            let mut session = self.session.lock();
            if session.destroyed {
                return;
            }
            match event {
                RowEvent::Entered(index) => {
                    if let Some(change) = session.interaction.hover(index) {
                        session.restyle(change);
                    }
                    None
                }
                RowEvent::Left(index) => {
                    if let Some(change) = session.interaction.leave(index) {
                        session.restyle(change);
                    }
                    None
                }
                RowEvent::Pressed(index) => {
                    let item = session.begin_commit(index);
                    if item.is_some() {
                        session.press_in_progress = true;
                        session.cancel_blur_close();
                    }
                    item
                }
            }
        };

        if let Some(item) = committed {
            self.finish_commit(item);
        }
    }

    /// Second half of a commit: write the field, notify, close.
    fn finish_commit(&self, item: T) {
        let shown = (self.config.display_value)(&item);
        tracing::debug!(target: targets::INTERACTION, value = %shown, "committing suggestion");
        self.field.set_value(&shown);
        (self.config.on_pick)(&item);

        let mut session = self.session.lock();
        if !session.destroyed {
            session.close();
        }
    }

    fn on_viewport_changed(&self) {
        let anchor = self.field.anchor_rect();
        let session = self.session.lock();
        if !session.destroyed {
            session.overlay.reposition(anchor);
        }
    }

    // =========================================================================
    // Handle operations
    // =========================================================================

    fn show(&self) {
        let anchor = self.field.anchor_rect();
        let mut session = self.session.lock();
        if !session.destroyed {
            session.overlay.show(anchor);
        }
    }

    fn hide(&self) {
        let mut session = self.session.lock();
        if !session.destroyed {
            session.close();
        }
    }

    fn destroy(&self) {
        let connections = {
            let mut session = self.session.lock();
            if session.destroyed {
                return;
            }
            session.destroyed = true;
            session.cancel_all();
            session.items.clear();
            session.interaction.close();
            session.overlay.destroy();
            std::mem::take(&mut session.connections)
        };

        for (listener, id) in connections {
            self.disconnect(listener, id);
        }
        tracing::debug!(target: targets::ATTACH, "typeahead destroyed");
    }
}

/// The handle returned by [`attach`].
///
/// Dropping the handle destroys the attachment.
#[must_use = "dropping the handle detaches the typeahead from its field"]
pub struct TypeaheadHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<Inner<T>>,
}

impl<T> TypeaheadHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Show the panel again if it still has rows.
    pub fn show(&self) {
        self.inner.show();
    }

    /// Hide the panel and discard its items.
    pub fn hide(&self) {
        self.inner.hide();
    }

    /// Detach from the field: disconnect every listener, release the panel
    /// and make pending work inert. Calling it again does nothing.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    /// A handle that can destroy the attachment without keeping it alive.
    ///
    /// Useful from inside callbacks such as `on_pick`.
    pub fn detacher(&self) -> Detacher<T> {
        Detacher {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether the panel is currently visible.
    pub fn is_open(&self) -> bool {
        self.inner.session.lock().overlay.is_visible()
    }

    /// Whether `destroy` has run.
    pub fn is_destroyed(&self) -> bool {
        self.inner.session.lock().destroyed
    }

    /// The interaction state.
    pub fn state(&self) -> InteractionState {
        self.inner.session.lock().interaction.state()
    }

    /// The highlighted row, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.inner.session.lock().interaction.active()
    }

    /// The items currently shown.
    pub fn items(&self) -> Vec<T> {
        self.inner.session.lock().items.clone()
    }

    /// The most recently issued search term.
    pub fn last_query(&self) -> Option<String> {
        self.inner.session.lock().last_query.clone()
    }

    /// Whether the overlay surface has been created.
    pub fn has_overlay(&self) -> bool {
        self.inner.session.lock().overlay.is_created()
    }
}

impl<T> Drop for TypeaheadHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.inner.destroy();
    }
}

impl<T> fmt::Debug for TypeaheadHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.inner.session.lock();
        f.debug_struct("TypeaheadHandle")
            .field("state", &session.interaction.state())
            .field("items", &session.items.len())
            .field("last_query", &session.last_query)
            .field("destroyed", &session.destroyed)
            .field("overlay", &session.overlay)
            .finish()
    }
}

/// A weak reference to an attachment that can only destroy it.
pub struct Detacher<T> {
    inner: Weak<Inner<T>>,
}

impl<T> Clone for Detacher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Detacher<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Destroy the attachment if it is still alive.
    pub fn destroy(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.destroy();
        }
    }
}

impl<T> fmt::Debug for Detacher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detacher")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
