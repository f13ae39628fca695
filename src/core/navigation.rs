//! Keyboard navigation over the entry grid as a pure transition function.

use crate::domain::Column;

/// Keys the grid reacts to. Everything else is left to text editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKeyCode {
    Tab,
    Enter,
    Up,
    Down,
    F2,
    F5,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridKey {
    pub code: GridKeyCode,
    pub shift: bool,
}

impl GridKey {
    pub fn new(code: GridKeyCode) -> Self {
        Self { code, shift: false }
    }

    pub fn shifted(code: GridKeyCode) -> Self {
        Self { code, shift: true }
    }
}

/// Focused cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub row: usize,
    pub column: Column,
}

impl Focus {
    pub fn origin() -> Self {
        Self {
            row: 0,
            column: Column::FIRST,
        }
    }

    pub fn at(row: usize, column: Column) -> Self {
        Self { row, column }
    }
}

/// Grid mutation a key asks for, applied before the focus moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    None,
    /// Append a detail line to the transaction owning `row`.
    AppendLine { row: usize },
    StartTransaction,
    AutoBalance,
    /// Not a navigation key; the focused field handles it.
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub focus: Focus,
    pub action: NavAction,
}

impl Transition {
    fn stay(focus: Focus, action: NavAction) -> Self {
        Self { focus, action }
    }

    fn to(focus: Focus) -> Self {
        Self {
            focus,
            action: NavAction::None,
        }
    }

    pub fn moved_from(&self, previous: Focus) -> bool {
        self.focus != previous
    }
}

/// Computes the next focus and any grid action for `key`.
///
/// `row_count` is the current number of rows. An appended line always lands
/// on `row + 1` because appending only happens from the last row.
pub fn transition(focus: Focus, key: GridKey, row_count: usize) -> Transition {
    let last_row = row_count.saturating_sub(1);
    let has_next = focus.row < last_row;

    match (key.code, key.shift) {
        (GridKeyCode::Tab, false) => match focus.column.next() {
            Some(column) => Transition::to(Focus::at(focus.row, column)),
            None if has_next => Transition::to(Focus::at(focus.row + 1, Column::FIRST)),
            None => Transition::stay(
                Focus::at(focus.row + 1, Column::FIRST),
                NavAction::AppendLine { row: focus.row },
            ),
        },
        (GridKeyCode::Tab, true) => match focus.column.prev() {
            Some(column) => Transition::to(Focus::at(focus.row, column)),
            None if focus.row > 0 => Transition::to(Focus::at(focus.row - 1, Column::LAST)),
            None => Transition::stay(focus, NavAction::None),
        },
        (GridKeyCode::Enter, _) if has_next => {
            Transition::to(Focus::at(focus.row + 1, Column::FIRST))
        }
        (GridKeyCode::Enter, _) => Transition::stay(
            Focus::at(focus.row + 1, Column::FIRST),
            NavAction::AppendLine { row: focus.row },
        ),
        (GridKeyCode::Up, _) if focus.row > 0 => {
            Transition::to(Focus::at(focus.row - 1, focus.column))
        }
        (GridKeyCode::Down, _) if has_next => {
            Transition::to(Focus::at(focus.row + 1, focus.column))
        }
        (GridKeyCode::Up | GridKeyCode::Down, _) => Transition::stay(focus, NavAction::None),
        (GridKeyCode::F2, _) => Transition::stay(
            Focus::at(row_count, Column::FIRST),
            NavAction::StartTransaction,
        ),
        (GridKeyCode::F5, _) => Transition::stay(focus, NavAction::AutoBalance),
        (GridKeyCode::Other, _) => Transition::stay(focus, NavAction::Passthrough),
    }
}
