use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Global shortcuts (handled by the event loop)
    ForceQuit,         // Ctrl+C
    NewSession,        // Ctrl+N
    ClearView,         // Ctrl+L
    RefreshSidebar,    // Ctrl+R
    ToggleSidebar,     // Ctrl+B
    SwitchFocus,       // Tab
    Resize,

    // Editing / navigation (routed to the focused component)
    Submit,
    Newline, // Shift+Enter, Alt+Enter, Ctrl+J
    Escape,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,

    // Message list scrolling
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToBottom, // Ctrl+End, re-enables follow mode
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, waiting up to `timeout`.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => translate_key(key_event),
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

/// Map a key press to an event. Release events (reported by the keyboard
/// enhancement protocol) are dropped.
pub fn translate_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key_event.modifiers.contains(KeyModifiers::SHIFT);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);

    match key_event.code {
        KeyCode::Char('c') if ctrl => Some(TuiEvent::ForceQuit),
        KeyCode::Char('n') if ctrl => Some(TuiEvent::NewSession),
        KeyCode::Char('l') if ctrl => Some(TuiEvent::ClearView),
        KeyCode::Char('r') if ctrl => Some(TuiEvent::RefreshSidebar),
        KeyCode::Char('b') if ctrl => Some(TuiEvent::ToggleSidebar),
        // Ctrl+J is ASCII LF; Ctrl+Enter sends this in most terminals
        KeyCode::Char('j') if ctrl => Some(TuiEvent::Newline),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Enter if shift || alt => Some(TuiEvent::Newline),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Tab | KeyCode::BackTab => Some(TuiEvent::SwitchFocus),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Up => Some(TuiEvent::CursorUp),
        KeyCode::Down => Some(TuiEvent::CursorDown),
        KeyCode::Home => Some(TuiEvent::CursorHome),
        KeyCode::End if ctrl => Some(TuiEvent::ScrollToBottom),
        KeyCode::End => Some(TuiEvent::CursorEnd),
        KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_enter_submits_and_modified_enter_inserts_newline() {
        assert_eq!(
            translate_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(TuiEvent::Submit)
        );
        assert_eq!(
            translate_key(key(KeyCode::Enter, KeyModifiers::SHIFT)),
            Some(TuiEvent::Newline)
        );
        assert_eq!(
            translate_key(key(KeyCode::Enter, KeyModifiers::ALT)),
            Some(TuiEvent::Newline)
        );
        assert_eq!(
            translate_key(key(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(TuiEvent::Newline)
        );
    }

    #[test]
    fn test_control_shortcuts() {
        let ctrl = |c| translate_key(key(KeyCode::Char(c), KeyModifiers::CONTROL));
        assert_eq!(ctrl('c'), Some(TuiEvent::ForceQuit));
        assert_eq!(ctrl('n'), Some(TuiEvent::NewSession));
        assert_eq!(ctrl('l'), Some(TuiEvent::ClearView));
        assert_eq!(ctrl('r'), Some(TuiEvent::RefreshSidebar));
        assert_eq!(ctrl('b'), Some(TuiEvent::ToggleSidebar));
        assert_eq!(ctrl('x'), None);
    }

    #[test]
    fn test_shifted_characters_are_input() {
        assert_eq!(
            translate_key(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('A'))
        );
    }

    #[test]
    fn test_release_events_ignored() {
        let mut release = key(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate_key(release), None);
    }
}
