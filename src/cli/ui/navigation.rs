use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::navigation::{GridKey, GridKeyCode};

/// What the editor loop should do with one terminal key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Grid(GridKey),
    Insert(char),
    Backspace,
    Save,
    Quit,
    Ignore,
}

/// Maps a bare key code onto the grid's navigation keys.
pub fn map_key_code(code: KeyCode, shift: bool) -> GridKey {
    let key = match code {
        KeyCode::Tab => GridKeyCode::Tab,
        KeyCode::BackTab => return GridKey::shifted(GridKeyCode::Tab),
        KeyCode::Enter => GridKeyCode::Enter,
        KeyCode::Up => GridKeyCode::Up,
        KeyCode::Down => GridKeyCode::Down,
        KeyCode::F(2) => GridKeyCode::F2,
        KeyCode::F(5) => GridKeyCode::F5,
        _ => GridKeyCode::Other,
    };
    GridKey { code: key, shift }
}

pub fn map_key_event(event: KeyEvent) -> EditorKey {
    if event.kind == KeyEventKind::Release {
        return EditorKey::Ignore;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);
    match event.code {
        KeyCode::Char('s') if ctrl => EditorKey::Save,
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => EditorKey::Quit,
        KeyCode::Esc => EditorKey::Quit,
        KeyCode::Char(ch) if !ctrl => EditorKey::Insert(ch),
        KeyCode::Backspace => EditorKey::Backspace,
        code => match map_key_code(code, shift) {
            GridKey {
                code: GridKeyCode::Other,
                ..
            } => EditorKey::Ignore,
            key => EditorKey::Grid(key),
        },
    }
}

/// Parses key names used by script mode (`tab`, `shift-tab`, `f5`...).
pub fn parse_key_name(name: &str) -> Option<GridKey> {
    let lowered = name.to_ascii_lowercase();
    let (shift, base) = match lowered.strip_prefix("shift-") {
        Some(rest) => (true, rest),
        None => (false, lowered.as_str()),
    };
    let code = match base {
        "tab" => GridKeyCode::Tab,
        "enter" => GridKeyCode::Enter,
        "up" => GridKeyCode::Up,
        "down" => GridKeyCode::Down,
        "f2" => GridKeyCode::F2,
        "f5" => GridKeyCode::F5,
        _ => return None,
    };
    Some(GridKey { code, shift })
}
