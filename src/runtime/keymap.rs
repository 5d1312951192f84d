//! Key bindings: mapping terminal key events to user actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePlayback,
    Next,
    Previous,
    SeekForward,
    SeekBackward,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    PlaySelected,
    CursorDown,
    CursorUp,
    CursorTop,
    CursorBottom,
    NextTab,
    ToggleShuffle,
    CycleRepeat,
    ToggleLike,
    ToggleLyrics,
    SearchStart,
    SearchInput(char),
    SearchBackspace,
    SearchCancel,
}

/// Translate a key press. While the search box has focus, printable keys
/// are search input and playback shortcuts are off.
pub fn action_for(key: KeyEvent, searching: bool) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        return match key.code {
            KeyCode::Char('n') => Some(Action::CursorDown),
            KeyCode::Char('p') => Some(Action::CursorUp),
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    if searching {
        return match key.code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Enter => Some(Action::PlaySelected),
            KeyCode::Down => Some(Action::CursorDown),
            KeyCode::Up => Some(Action::CursorUp),
            KeyCode::Char(c) if !c.is_control() => Some(Action::SearchInput(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(' ') => Some(Action::TogglePlayback),
        KeyCode::Right => Some(Action::Next),
        KeyCode::Left => Some(Action::Previous),
        KeyCode::Up => Some(Action::VolumeUp),
        KeyCode::Down => Some(Action::VolumeDown),
        KeyCode::Char('l' | 'L') => Some(Action::SeekForward),
        KeyCode::Char('j' | 'J') => Some(Action::SeekBackward),
        KeyCode::Char('m' | 'M') => Some(Action::ToggleMute),
        KeyCode::Enter => Some(Action::PlaySelected),
        KeyCode::Char('n') => Some(Action::CursorDown),
        KeyCode::Char('p') => Some(Action::CursorUp),
        KeyCode::Char('g') => Some(Action::CursorTop),
        KeyCode::Char('G') => Some(Action::CursorBottom),
        KeyCode::Tab => Some(Action::NextTab),
        KeyCode::Char('/') => Some(Action::SearchStart),
        KeyCode::Esc => Some(Action::SearchCancel),
        KeyCode::Char('s') => Some(Action::ToggleShuffle),
        KeyCode::Char('r') => Some(Action::CycleRepeat),
        KeyCode::Char('f') => Some(Action::ToggleLike),
        KeyCode::Char('y') => Some(Action::ToggleLyrics),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn playback_shortcuts() {
        assert_eq!(action_for(key(KeyCode::Char(' ')), false), Some(Action::TogglePlayback));
        assert_eq!(action_for(key(KeyCode::Right), false), Some(Action::Next));
        assert_eq!(action_for(key(KeyCode::Left), false), Some(Action::Previous));
        assert_eq!(action_for(key(KeyCode::Up), false), Some(Action::VolumeUp));
        assert_eq!(action_for(key(KeyCode::Down), false), Some(Action::VolumeDown));
        assert_eq!(action_for(key(KeyCode::Char('l')), false), Some(Action::SeekForward));
        assert_eq!(action_for(key(KeyCode::Char('j')), false), Some(Action::SeekBackward));
        assert_eq!(action_for(key(KeyCode::Char('m')), false), Some(Action::ToggleMute));
        assert_eq!(action_for(key(KeyCode::Char('M')), false), Some(Action::ToggleMute));
    }

    #[test]
    fn search_box_swallows_shortcut_letters() {
        assert_eq!(action_for(key(KeyCode::Char('m')), true), Some(Action::SearchInput('m')));
        assert_eq!(action_for(key(KeyCode::Char(' ')), true), Some(Action::SearchInput(' ')));
        assert_eq!(action_for(key(KeyCode::Char('q')), true), Some(Action::SearchInput('q')));
        assert_eq!(action_for(key(KeyCode::Left), true), None);
        assert_eq!(action_for(key(KeyCode::Esc), true), Some(Action::SearchCancel));
        assert_eq!(action_for(key(KeyCode::Backspace), true), Some(Action::SearchBackspace));
        assert_eq!(action_for(key(KeyCode::Enter), true), Some(Action::PlaySelected));
    }

    #[test]
    fn control_chords_work_everywhere() {
        for searching in [false, true] {
            assert_eq!(action_for(ctrl('n'), searching), Some(Action::CursorDown));
            assert_eq!(action_for(ctrl('p'), searching), Some(Action::CursorUp));
            assert_eq!(action_for(ctrl('c'), searching), Some(Action::Quit));
            assert_eq!(action_for(ctrl('m'), searching), None);
        }
    }

    #[test]
    fn unbound_keys_do_nothing() {
        assert_eq!(action_for(key(KeyCode::Char('x')), false), None);
        assert_eq!(action_for(key(KeyCode::F(1)), false), None);
    }
}
