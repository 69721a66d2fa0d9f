use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{Intent, ViewMode};

/// What a key press asks of the event loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Re-index the library in the background.
    Rescan,
    /// Clear and repaint the terminal.
    Redraw,
    Intent(Intent),
}

/// Decode a key event for the given view. Releases and repeats are ignored.
pub fn action_for_key(key: KeyEvent, mode: ViewMode) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    if mode == ViewMode::Search {
        let intent = match key.code {
            KeyCode::Enter => Intent::Select,
            KeyCode::Esc => Intent::Back,
            KeyCode::Backspace => Intent::Backspace,
            KeyCode::Up => Intent::Up,
            KeyCode::Down => Intent::Down,
            KeyCode::Char(c) if !c.is_control() => Intent::Input(c),
            _ => return None,
        };
        return Some(Action::Intent(intent));
    }

    let intent = match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('R') => return Some(Action::Rescan),
        KeyCode::Char('r') => return Some(Action::Redraw),
        KeyCode::Up | KeyCode::Char('k') => Intent::Up,
        KeyCode::Down | KeyCode::Char('j') => Intent::Down,
        KeyCode::Enter => Intent::Select,
        KeyCode::Esc | KeyCode::Backspace => Intent::Back,
        KeyCode::Char(' ') => Intent::TogglePause,
        KeyCode::Char('p') => Intent::Play,
        KeyCode::Char('s') => Intent::Shuffle,
        KeyCode::Char('n') => Intent::Advance,
        KeyCode::Char('x') => Intent::VolumeUp,
        KeyCode::Char('z') => Intent::VolumeDown,
        KeyCode::Char('b') | KeyCode::Char('/') => Intent::Search,
        _ => return None,
    };
    Some(Action::Intent(intent))
}
