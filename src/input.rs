//! Key bindings for menus and global commands. Block placement is mouse-only.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Command from a key press. Placement gestures never originate here; they
/// come from mouse events hit-tested against the screen layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Enter/Space: start from the menu, confirm in the quit menu.
    Confirm,
    /// `r`: play again from the results screen.
    Restart,
    NavUp,
    NavDown,
    Quit,
    None,
}

/// Map key event to a command. Arrows and vim j/k both navigate.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Confirm,
        KeyCode::Char('r') => Action::Restart,
        KeyCode::Up | KeyCode::Char('k') => Action::NavUp,
        KeyCode::Down | KeyCode::Char('j') => Action::NavDown,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_global_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Confirm);
        assert_eq!(key_to_action(key(KeyCode::Char('r'))), Action::Restart);
        assert_eq!(key_to_action(key(KeyCode::Char('j'))), Action::NavDown);
        assert_eq!(key_to_action(key(KeyCode::Up)), Action::NavUp);
    }

    #[test]
    fn modified_keys_are_ignored() {
        let k = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(k), Action::None);
    }
}
