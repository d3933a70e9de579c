//! The text field capability a typeahead attaches to.
//!
//! A host toolkit exposes each of its line edits through [`TextField`]. The
//! controller never touches toolkit types directly: it reads and writes the
//! value, asks where the field is on screen, and listens to the signals in
//! [`FieldSignals`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use typeahead_core::{Rect, Signal};

/// The kind of text control a field is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A plain single-line text input.
    SingleLine,
    /// A single-line search input.
    Search,
    /// A masked password input.
    Password,
    /// A multi-line text area.
    MultiLine,
}

impl FieldKind {
    /// Whether a typeahead may be attached to this kind of field.
    pub fn accepts_typeahead(&self) -> bool {
        matches!(self, Self::SingleLine | Self::Search)
    }
}

/// Keys the typeahead reacts to.
///
/// Hosts map their native key codes onto this enum; anything the typeahead
/// does not care about can be reported as [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Tab,
    Backspace,
    Character(char),
    Other,
}

/// Keyboard modifiers held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// A key press delivered to the field.
///
/// The typeahead accepts the events it consumes (navigation, commit and
/// dismissal while the panel is open). Hosts check [`is_accepted`] after
/// emitting and skip their default handling for accepted events, e.g. moving
/// the caret on ArrowUp or submitting a form on Enter.
///
/// [`is_accepted`]: KeyPressEvent::is_accepted
#[derive(Debug)]
pub struct KeyPressEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
    accepted: AtomicBool,
}

impl KeyPressEvent {
    /// Create a new key press event with no modifiers.
    pub fn new(key: Key) -> Self {
        Self::with_modifiers(key, KeyboardModifiers::NONE)
    }

    /// Create a new key press event.
    pub fn with_modifiers(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            key,
            modifiers,
            accepted: AtomicBool::new(false),
        }
    }

    /// Accept the event, suppressing the host's default action.
    pub fn accept(&self) {
        self.accepted.store(true, Ordering::SeqCst);
    }

    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted.load(Ordering::SeqCst)
    }
}

/// Signals a text field emits.
#[derive(Debug, Default)]
pub struct FieldSignals {
    /// The user changed the text. Carries the new raw value.
    pub text_edited: Signal<String>,
    /// The field gained keyboard focus.
    pub focus_in: Signal<()>,
    /// The field lost keyboard focus.
    pub focus_out: Signal<()>,
    /// A key was pressed while the field had focus.
    pub key_pressed: Signal<Arc<KeyPressEvent>>,
}

impl FieldSignals {
    /// Create a set of signals with no connections.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A single-line text control provided by the host toolkit.
pub trait TextField: Send + Sync {
    /// The kind of control this is.
    fn kind(&self) -> FieldKind;

    /// The current raw value.
    fn value(&self) -> String;

    /// Replace the value programmatically.
    ///
    /// Implementations must not emit `text_edited` for programmatic updates;
    /// only user edits trigger searches.
    fn set_value(&self, value: &str);

    /// The field's current rectangle in viewport coordinates.
    fn anchor_rect(&self) -> Rect;

    /// The signals this field emits.
    fn signals(&self) -> &FieldSignals;
}
