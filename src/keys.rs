use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Canonical string form of a key event, e.g. `"q"`, `"P"`, `"ctrl+e"`,
/// `"shift+down"`, `"space"`. Controller bindings are declared in this form
/// and incoming events are canonicalized before resolution.
pub fn canonicalize_key_event(event: KeyEvent) -> Option<String> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    let mut shift = event.modifiers.contains(KeyModifiers::SHIFT);

    let key = match event.code {
        KeyCode::Char(' ') => {
            shift = false;
            "space".to_string()
        }
        KeyCode::Char(c) => {
            // Char events already carry case; the shift modifier is not part
            // of the identity.
            shift = false;
            c.to_string()
        }
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => {
            shift = true;
            "tab".to_string()
        }
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        _ => return None,
    };

    Some(canonical_key_string(key, ctrl, alt, shift))
}

fn canonical_key_string(key: String, ctrl: bool, alt: bool, shift: bool) -> String {
    let mut parts = Vec::new();
    if ctrl {
        parts.push("ctrl".to_string());
    }
    if alt {
        parts.push("alt".to_string());
    }
    if shift {
        parts.push("shift".to_string());
    }
    parts.push(key);
    parts.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn canonicalizes_plain_and_modified_keys() {
        assert_eq!(
            canonicalize_key_event(event(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some("q".to_string())
        );
        assert_eq!(
            canonicalize_key_event(event(KeyCode::Char('e'), KeyModifiers::CONTROL)),
            Some("ctrl+e".to_string())
        );
        assert_eq!(
            canonicalize_key_event(event(KeyCode::Down, KeyModifiers::SHIFT)),
            Some("shift+down".to_string())
        );
        assert_eq!(
            canonicalize_key_event(event(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some("space".to_string())
        );
    }

    #[test]
    fn uppercase_char_drops_shift_modifier() {
        assert_eq!(
            canonicalize_key_event(event(KeyCode::Char('P'), KeyModifiers::SHIFT)),
            Some("P".to_string())
        );
    }

    #[test]
    fn backtab_becomes_shift_tab() {
        assert_eq!(
            canonicalize_key_event(event(KeyCode::BackTab, KeyModifiers::NONE)),
            Some("shift+tab".to_string())
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert_eq!(
            canonicalize_key_event(event(KeyCode::F(5), KeyModifiers::NONE)),
            None
        );
    }
}
