//! Keyboard and pointer interaction state machine.
//!
//! [`Interaction`] tracks whether the panel is open and which row is active.
//! It knows nothing about items or surfaces: every transition returns what
//! changed so the caller can restyle exactly the affected rows.

use crate::field::Key;

/// Observable state of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// The panel is hidden.
    #[default]
    Closed,
    /// The panel shows rows and none is active.
    Open,
    /// The panel shows rows and row `i` is active.
    Highlighted(usize),
}

/// A change of the active row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightChange {
    /// The row that was active before, if any.
    pub previous: Option<usize>,
    /// The row that is active now, if any.
    pub current: Option<usize>,
}

/// What a key press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Restyle the rows named by the change.
    Highlight(HighlightChange),
    /// Commit the item at this index.
    Commit(usize),
    /// Close the panel, discarding its items.
    Dismiss,
    /// The key belongs to the panel but changes nothing.
    Consumed,
    /// Not ours; let the host handle the key.
    Ignore,
}

/// The active-row state machine of one attachment.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    open: bool,
    row_count: usize,
    active: Option<usize>,
}

impl Interaction {
    /// Create a closed state machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> InteractionState {
        match (self.open, self.active) {
            (false, _) => InteractionState::Closed,
            (true, None) => InteractionState::Open,
            (true, Some(index)) => InteractionState::Highlighted(index),
        }
    }

    /// The active row, if any.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Number of interactive rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Whether the panel is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The panel was painted with `row_count` interactive rows.
    ///
    /// Nothing is highlighted afterwards. `row_count` may be zero when only
    /// the empty-state row is shown.
    pub fn open(&mut self, row_count: usize) {
        self.open = true;
        self.row_count = row_count;
        self.active = None;
    }

    /// The panel was hidden.
    pub fn close(&mut self) {
        self.open = false;
        self.row_count = 0;
        self.active = None;
    }

    fn activate(&mut self, current: Option<usize>) -> Option<HighlightChange> {
        let previous = self.active;
        if previous == current {
            return None;
        }
        self.active = current;
        Some(HighlightChange { previous, current })
    }

    /// Move the highlight down one row, wrapping from the last row to the first.
    pub fn move_next(&mut self) -> Option<HighlightChange> {
        if !self.open || self.row_count == 0 {
            return None;
        }
        let next = match self.active {
            Some(index) => (index + 1) % self.row_count,
            None => 0,
        };
        self.activate(Some(next))
    }

    /// Move the highlight up one row, wrapping from the first row to the last.
    pub fn move_previous(&mut self) -> Option<HighlightChange> {
        if !self.open || self.row_count == 0 {
            return None;
        }
        let previous = match self.active {
            Some(index) => (index + self.row_count - 1) % self.row_count,
            None => self.row_count - 1,
        };
        self.activate(Some(previous))
    }

    /// The pointer entered row `index`.
    pub fn hover(&mut self, index: usize) -> Option<HighlightChange> {
        if !self.open || index >= self.row_count {
            return None;
        }
        self.activate(Some(index))
    }

    /// The pointer left row `index`; clears the highlight, keeps the panel open.
    pub fn leave(&mut self, index: usize) -> Option<HighlightChange> {
        if !self.open || self.active != Some(index) {
            return None;
        }
        self.activate(None)
    }

    /// Translate a key press into an action.
    pub fn on_key(&mut self, key: Key) -> KeyAction {
        if !self.open {
            return KeyAction::Ignore;
        }
        match key {
            Key::ArrowDown | Key::ArrowUp if self.row_count == 0 => KeyAction::Ignore,
            Key::ArrowDown => self
                .move_next()
                .map_or(KeyAction::Consumed, KeyAction::Highlight),
            Key::ArrowUp => self
                .move_previous()
                .map_or(KeyAction::Consumed, KeyAction::Highlight),
            Key::Enter => self.active.map_or(KeyAction::Ignore, KeyAction::Commit),
            Key::Escape => KeyAction::Dismiss,
            _ => KeyAction::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_with(rows: usize) -> Interaction {
        let mut interaction = Interaction::new();
        interaction.open(rows);
        interaction
    }

    #[test]
    fn test_open_starts_without_highlight() {
        let interaction = open_with(3);
        assert_eq!(interaction.state(), InteractionState::Open);
        assert_eq!(interaction.active(), None);
    }

    #[test]
    fn test_arrow_down_wraps_to_first_row() {
        let mut interaction = open_with(3);

        assert_eq!(
            interaction.on_key(Key::ArrowDown),
            KeyAction::Highlight(HighlightChange {
                previous: None,
                current: Some(0)
            })
        );
        interaction.on_key(Key::ArrowDown);
        interaction.on_key(Key::ArrowDown);
        assert_eq!(interaction.active(), Some(2));

        assert_eq!(
            interaction.on_key(Key::ArrowDown),
            KeyAction::Highlight(HighlightChange {
                previous: Some(2),
                current: Some(0)
            })
        );
    }

    #[test]
    fn test_arrow_up_wraps_to_last_row() {
        let mut interaction = open_with(3);
        interaction.move_next();
        assert_eq!(interaction.active(), Some(0));

        interaction.on_key(Key::ArrowUp);
        assert_eq!(interaction.active(), Some(2));
    }

    #[test]
    fn test_arrow_up_from_no_highlight_goes_to_last_row() {
        let mut interaction = open_with(4);
        interaction.on_key(Key::ArrowUp);
        assert_eq!(interaction.state(), InteractionState::Highlighted(3));
    }

    #[test]
    fn test_arrows_are_noops_without_rows() {
        let mut interaction = open_with(0);
        assert_eq!(interaction.on_key(Key::ArrowDown), KeyAction::Ignore);
        assert_eq!(interaction.on_key(Key::ArrowUp), KeyAction::Ignore);
        assert_eq!(interaction.active(), None);
    }

    #[test]
    fn test_single_row_wraps_onto_itself() {
        let mut interaction = open_with(1);
        interaction.move_next();
        assert_eq!(interaction.move_next(), None);
        assert_eq!(interaction.active(), Some(0));

        assert_eq!(interaction.on_key(Key::ArrowDown), KeyAction::Consumed);
        assert_eq!(interaction.on_key(Key::ArrowUp), KeyAction::Consumed);
        assert_eq!(interaction.state(), InteractionState::Highlighted(0));
    }

    #[test]
    fn test_enter_without_highlight_is_ignored() {
        let mut interaction = open_with(2);
        assert_eq!(interaction.on_key(Key::Enter), KeyAction::Ignore);

        interaction.move_next();
        assert_eq!(interaction.on_key(Key::Enter), KeyAction::Commit(0));
    }

    #[test]
    fn test_escape_dismisses_only_when_open() {
        let mut interaction = open_with(2);
        assert_eq!(interaction.on_key(Key::Escape), KeyAction::Dismiss);

        interaction.close();
        assert_eq!(interaction.on_key(Key::Escape), KeyAction::Ignore);
        assert_eq!(interaction.on_key(Key::ArrowDown), KeyAction::Ignore);
    }

    #[test]
    fn test_hover_and_leave() {
        let mut interaction = open_with(3);

        assert_eq!(
            interaction.hover(1),
            Some(HighlightChange {
                previous: None,
                current: Some(1)
            })
        );
        assert_eq!(interaction.hover(7), None);

        // Leaving a row that is not active changes nothing.
        assert_eq!(interaction.leave(0), None);

        interaction.leave(1);
        assert_eq!(interaction.state(), InteractionState::Open);
    }

    #[test]
    fn test_close_resets_everything() {
        let mut interaction = open_with(3);
        interaction.move_next();
        interaction.close();

        assert_eq!(interaction.state(), InteractionState::Closed);
        assert_eq!(interaction.row_count(), 0);
        assert_eq!(interaction.hover(0), None);
    }
}
