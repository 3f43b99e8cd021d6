// ABOUTME: Translates crossterm key events into the byte sequences a remote shell expects

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Ctrl+Q leaves the terminal view; everything else goes to the shell.
pub fn is_leave_key(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn encode_key(key: &KeyEvent) -> Option<String> {
    let encoded = match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if !c.is_ascii() {
                return None;
            }
            char::from((c.to_ascii_lowercase() as u8) & 0x1f).to_string()
        }
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::ALT) => format!("\x1b{c}"),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "\r".to_string(),
        KeyCode::Tab => "\t".to_string(),
        KeyCode::BackTab => "\x1b[Z".to_string(),
        KeyCode::Backspace => "\x7f".to_string(),
        KeyCode::Esc => "\x1b".to_string(),
        KeyCode::Up => "\x1b[A".to_string(),
        KeyCode::Down => "\x1b[B".to_string(),
        KeyCode::Right => "\x1b[C".to_string(),
        KeyCode::Left => "\x1b[D".to_string(),
        KeyCode::Home => "\x1b[H".to_string(),
        KeyCode::End => "\x1b[F".to_string(),
        KeyCode::PageUp => "\x1b[5~".to_string(),
        KeyCode::PageDown => "\x1b[6~".to_string(),
        KeyCode::Delete => "\x1b[3~".to_string(),
        KeyCode::Insert => "\x1b[2~".to_string(),
        KeyCode::F(n) => function_key(n)?.to_string(),
        _ => return None,
    };
    Some(encoded)
}

fn function_key(n: u8) -> Option<&'static str> {
    let seq = match n {
        1 => "\x1bOP",
        2 => "\x1bOQ",
        3 => "\x1bOR",
        4 => "\x1bOS",
        5 => "\x1b[15~",
        6 => "\x1b[17~",
        7 => "\x1b[18~",
        8 => "\x1b[19~",
        9 => "\x1b[20~",
        10 => "\x1b[21~",
        11 => "\x1b[23~",
        12 => "\x1b[24~",
        _ => return None,
    };
    Some(seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_and_control_characters() {
        assert_eq!(
            encode_key(&key(KeyCode::Char('a'), KeyModifiers::NONE)).as_deref(),
            Some("a")
        );
        assert_eq!(
            encode_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)).as_deref(),
            Some("\x03")
        );
        assert_eq!(
            encode_key(&key(KeyCode::Char('b'), KeyModifiers::ALT)).as_deref(),
            Some("\x1bb")
        );
    }

    #[test]
    fn test_navigation_sequences() {
        assert_eq!(encode_key(&key(KeyCode::Up, KeyModifiers::NONE)).as_deref(), Some("\x1b[A"));
        assert_eq!(encode_key(&key(KeyCode::Backspace, KeyModifiers::NONE)).as_deref(), Some("\x7f"));
        assert_eq!(encode_key(&key(KeyCode::F(5), KeyModifiers::NONE)).as_deref(), Some("\x1b[15~"));
        assert_eq!(encode_key(&key(KeyCode::F(20), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_leave_key() {
        assert!(is_leave_key(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(!is_leave_key(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
    }
}
