//! Output history for a PTY - printable text split into lines
//!
//! This is not a terminal emulator. Control sequences are skipped, carriage
//! return restarts the current line and backspace erases one character.
//! OSC 0/2 payloads are kept as the window title.

use std::collections::VecDeque;

/// Lines kept per session
const MAX_LINES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Ground,
    Escape,
    Csi,
    Osc,
    OscEscape,
}

#[derive(Debug, Clone)]
pub struct OutputBuffer {
    lines: VecDeque<String>,
    state: State,
    /// A `\r` was seen; the next printable character restarts the line
    restart_line: bool,
    osc: String,
    /// Incomplete UTF-8 sequence left over from the last read
    partial: Vec<u8>,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        let mut lines = VecDeque::new();
        lines.push_back(String::new());
        Self {
            lines,
            state: State::Ground,
            restart_line: false,
            osc: String::new(),
            partial: Vec::new(),
        }
    }
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw child output. A multibyte character split across reads is
    /// held back until its remaining bytes arrive; invalid bytes become U+FFFD.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Option<String> {
        let mut data = std::mem::take(&mut self.partial);
        data.extend_from_slice(bytes);

        let mut text = String::with_capacity(data.len());
        let mut rest = data.as_slice();
        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    rest = &[];
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => break,
                    }
                }
            }
        }
        self.partial = rest.to_vec();
        self.push_str(&text)
    }

    /// Append child output; returns a new window title if one was set
    pub fn push_str(&mut self, text: &str) -> Option<String> {
        let mut title = None;
        for c in text.chars() {
            match self.state {
                State::Ground => self.ground(c),
                State::Escape => {
                    self.state = match c {
                        '[' => State::Csi,
                        ']' => {
                            self.osc.clear();
                            State::Osc
                        }
                        _ => State::Ground,
                    }
                }
                State::Csi => {
                    if ('\x40'..='\x7e').contains(&c) {
                        self.state = State::Ground;
                    }
                }
                State::Osc => match c {
                    '\x07' => {
                        title = self.finish_osc().or(title);
                        self.state = State::Ground;
                    }
                    '\x1b' => self.state = State::OscEscape,
                    _ => self.osc.push(c),
                },
                State::OscEscape => {
                    title = self.finish_osc().or(title);
                    self.state = State::Ground;
                }
            }
        }
        title
    }

    fn ground(&mut self, c: char) {
        match c {
            '\x1b' => self.state = State::Escape,
            '\n' => {
                self.restart_line = false;
                self.lines.push_back(String::new());
                if self.lines.len() > MAX_LINES {
                    self.lines.pop_front();
                }
            }
            '\r' => self.restart_line = true,
            '\x08' => {
                if let Some(line) = self.lines.back_mut() {
                    line.pop();
                }
            }
            '\t' => self.print(' '),
            c if c.is_control() => {}
            c => self.print(c),
        }
    }

    fn print(&mut self, c: char) {
        if let Some(line) = self.lines.back_mut() {
            if self.restart_line {
                line.clear();
                self.restart_line = false;
            }
            line.push(c);
        }
    }

    fn finish_osc(&mut self) -> Option<String> {
        let payload = std::mem::take(&mut self.osc);
        let (kind, text) = payload.split_once(';')?;
        matches!(kind, "0" | "2").then(|| text.to_string())
    }

    /// The last `n` lines, oldest first
    pub fn tail(&self, n: usize) -> Vec<String> {
        let start = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(start).cloned().collect()
    }

    /// The most recent non-empty line, trailing blanks removed
    pub fn last_line(&self) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .map(|l| l.trim_end())
            .find(|l| !l.is_empty())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_and_color_codes() {
        let mut out = OutputBuffer::new();
        out.push_str("\x1b[1;32mok\x1b[0m done\r\nnext");
        assert_eq!(out.tail(2), vec!["ok done", "next"]);
    }

    #[test]
    fn test_carriage_return_and_backspace() {
        let mut out = OutputBuffer::new();
        out.push_str("progress 10%\rprogress 99%");
        assert_eq!(out.tail(1), vec!["progress 99%"]);
        out.push_str("\x08\x08ne");
        assert_eq!(out.tail(1), vec!["progress 9ne"]);
    }

    #[test]
    fn test_title_sequence() {
        let mut out = OutputBuffer::new();
        assert_eq!(
            out.push_str("\x1b]0;vim main.rs\x07$ "),
            Some("vim main.rs".to_string())
        );
        assert_eq!(out.push_str("\x1b]2;htop\x1b\\"), Some("htop".to_string()));
        assert_eq!(out.push_str("\x1b]7;file:///tmp\x07"), None);
        assert_eq!(out.tail(1), vec!["$ "]);
    }

    #[test]
    fn test_sequence_split_across_chunks() {
        let mut out = OutputBuffer::new();
        out.push_str("a\x1b[3");
        out.push_str("1mb");
        assert_eq!(out.tail(1), vec!["ab"]);
    }

    #[test]
    fn test_utf8_split_across_reads() {
        let mut out = OutputBuffer::new();
        out.push_bytes(b"caf\xc3");
        assert_eq!(out.tail(1), vec!["caf"]);
        out.push_bytes(b"\xa9 \xe2\x82");
        out.push_bytes(b"\xac");
        assert_eq!(out.tail(1), vec!["café €"]);
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let mut out = OutputBuffer::new();
        out.push_bytes(b"a\xffb");
        assert_eq!(out.tail(1), vec!["a\u{fffd}b"]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut out = OutputBuffer::new();
        for i in 0..(MAX_LINES + 50) {
            out.push_str(&format!("line {}\n", i));
        }
        assert_eq!(out.len(), MAX_LINES);
    }

    #[test]
    fn test_last_line() {
        let mut out = OutputBuffer::new();
        assert!(out.last_line().is_none());
        out.push_str("first\nsecond  \n\n");
        assert_eq!(out.last_line(), Some("second"));
    }
}
