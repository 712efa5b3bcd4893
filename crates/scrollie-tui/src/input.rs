use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    StepDown,
    StepUp,
    PageDown,
    PageUp,
    JumpToTop,
    JumpToBottom,
    /// Interrupt the running animation where it is
    Stop,
    /// Switch between native frames and the timer fallback
    ToggleFrames,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::StepDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::StepUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::StepDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::StepUp,

        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::PageDown,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,
        (KeyCode::PageUp, _) => Action::PageUp,

        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::JumpToTop,
        (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), KeyModifiers::SHIFT) => Action::JumpToBottom,
        (KeyCode::Char('G'), KeyModifiers::NONE) => Action::JumpToBottom,
        (KeyCode::End, _) => Action::JumpToBottom,

        (KeyCode::Char('s'), KeyModifiers::NONE) => Action::Stop,
        (KeyCode::Esc, _) => Action::Stop,
        (KeyCode::Char('t'), KeyModifiers::NONE) => Action::ToggleFrames,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Char('j'), KeyModifiers::NONE)), Action::StepDown);
        assert_eq!(handle_key_event(key(KeyCode::Up, KeyModifiers::NONE)), Action::StepUp);
        assert_eq!(handle_key_event(key(KeyCode::Char('G'), KeyModifiers::SHIFT)), Action::JumpToBottom);
        assert_eq!(handle_key_event(key(KeyCode::Char('f'), KeyModifiers::CONTROL)), Action::PageDown);
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Esc, KeyModifiers::NONE)), Action::Stop);
        assert_eq!(handle_key_event(key(KeyCode::Char('t'), KeyModifiers::NONE)), Action::ToggleFrames);
        assert_eq!(handle_key_event(key(KeyCode::Char('x'), KeyModifiers::NONE)), Action::None);
    }
}
