//! Key encoding - bytes sent to the child for keys that are not chords

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Encode a key press the way a plain VT100-style terminal would.
/// Keys with no encoding yield an empty vector.
pub fn encode_key(event: &KeyEvent) -> Vec<u8> {
    let mut bytes = Vec::new();

    if event.modifiers.contains(KeyModifiers::ALT) {
        bytes.push(0x1b);
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(c) = event.code {
            let control = match c {
                c if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase() as u8 - b'a' + 1),
                '[' => Some(0x1b),
                '\\' => Some(0x1c),
                ']' => Some(0x1d),
                '^' => Some(0x1e),
                '_' => Some(0x1f),
                ' ' | '@' => Some(0x00),
                '?' => Some(0x7f),
                _ => None,
            };
            if let Some(byte) = control {
                bytes.push(byte);
                return bytes;
            }
        }
    }

    match event.code {
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
        KeyCode::Enter => bytes.push(b'\r'),
        KeyCode::Backspace => bytes.push(0x7f),
        KeyCode::Tab => bytes.push(b'\t'),
        KeyCode::BackTab => bytes.extend_from_slice(b"\x1b[Z"),
        KeyCode::Esc => bytes.push(0x1b),

        KeyCode::Up => bytes.extend_from_slice(b"\x1b[A"),
        KeyCode::Down => bytes.extend_from_slice(b"\x1b[B"),
        KeyCode::Right => bytes.extend_from_slice(b"\x1b[C"),
        KeyCode::Left => bytes.extend_from_slice(b"\x1b[D"),

        KeyCode::Home => bytes.extend_from_slice(b"\x1b[1~"),
        KeyCode::Insert => bytes.extend_from_slice(b"\x1b[2~"),
        KeyCode::Delete => bytes.extend_from_slice(b"\x1b[3~"),
        KeyCode::End => bytes.extend_from_slice(b"\x1b[4~"),
        KeyCode::PageUp => bytes.extend_from_slice(b"\x1b[5~"),
        KeyCode::PageDown => bytes.extend_from_slice(b"\x1b[6~"),

        KeyCode::F(1) => bytes.extend_from_slice(b"\x1bOP"),
        KeyCode::F(2) => bytes.extend_from_slice(b"\x1bOQ"),
        KeyCode::F(3) => bytes.extend_from_slice(b"\x1bOR"),
        KeyCode::F(4) => bytes.extend_from_slice(b"\x1bOS"),
        KeyCode::F(5) => bytes.extend_from_slice(b"\x1b[15~"),
        KeyCode::F(6) => bytes.extend_from_slice(b"\x1b[17~"),
        KeyCode::F(7) => bytes.extend_from_slice(b"\x1b[18~"),
        KeyCode::F(8) => bytes.extend_from_slice(b"\x1b[19~"),
        KeyCode::F(9) => bytes.extend_from_slice(b"\x1b[20~"),
        KeyCode::F(10) => bytes.extend_from_slice(b"\x1b[21~"),
        KeyCode::F(11) => bytes.extend_from_slice(b"\x1b[23~"),
        KeyCode::F(12) => bytes.extend_from_slice(b"\x1b[24~"),

        _ => bytes.clear(),
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_and_control_chars() {
        assert_eq!(encode_key(&key(KeyCode::Char('a'), KeyModifiers::NONE)), b"a");
        assert_eq!(encode_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)), vec![0x03]);
        assert_eq!(encode_key(&key(KeyCode::Char('é'), KeyModifiers::NONE)), "é".as_bytes());
    }

    #[test]
    fn test_alt_prefixes_escape() {
        assert_eq!(encode_key(&key(KeyCode::Char('b'), KeyModifiers::ALT)), b"\x1bb");
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(encode_key(&key(KeyCode::Enter, KeyModifiers::NONE)), b"\r");
        assert_eq!(encode_key(&key(KeyCode::Up, KeyModifiers::NONE)), b"\x1b[A");
        assert_eq!(encode_key(&key(KeyCode::F(5), KeyModifiers::NONE)), b"\x1b[15~");
        assert!(encode_key(&key(KeyCode::F(20), KeyModifiers::NONE)).is_empty());
        assert!(encode_key(&key(KeyCode::CapsLock, KeyModifiers::ALT)).is_empty());
    }
}
