//! Line-oriented `key=value` properties document.
//!
//! Lines are kept as raw bytes so files in ISO-8859-1 or any other
//! ASCII-compatible encoding survive an update unchanged. Each line
//! remembers whether it ended in `\r\n` or `\n`; only the key line is ever
//! rewritten. Comments and blank lines are ordinary lines.

use crate::constants::KEY_SEPARATOR;

/// What an append did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLineChange {
    /// The existing key line at `index` was extended with `,<token>`.
    Extended { index: usize },
    /// No key line existed; `key=<token>` was appended at `index`.
    Appended { index: usize },
}

impl KeyLineChange {
    pub fn index(&self) -> usize {
        match *self {
            KeyLineChange::Extended { index } | KeyLineChange::Appended { index } => index,
        }
    }

    pub fn was_appended(&self) -> bool {
        matches!(self, KeyLineChange::Appended { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    text: Vec<u8>,
    crlf: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesDocument {
    lines: Vec<Line>,
}

impl PropertiesDocument {
    /// Split `content` on `\n`. A `\r` before the `\n` is recorded and
    /// written back by `render`, so CRLF lines keep their terminator.
    pub fn parse(content: &[u8]) -> Self {
        let mut lines = Vec::new();
        let mut rest = content;
        while !rest.is_empty() {
            let (raw, next) = match rest.iter().position(|&b| b == b'\n') {
                Some(i) => (&rest[..i], &rest[i + 1..]),
                None => (rest, &rest[rest.len()..]),
            };
            let line = match raw.strip_suffix(b"\r") {
                Some(text) => Line {
                    text: text.to_vec(),
                    crlf: true,
                },
                None => Line {
                    text: raw.to_vec(),
                    crlf: false,
                },
            };
            lines.push(line);
            rest = next;
        }
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line contents without terminators.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.lines.iter().map(|line| line.text.as_slice())
    }

    /// Index of the first line that starts with `key=`.
    pub fn find_key_line(&self, key: &str) -> Option<usize> {
        self.lines.iter().position(|line| is_key_line(&line.text, key))
    }

    pub fn count_key_lines(&self, key: &str) -> usize {
        self.lines
            .iter()
            .filter(|line| is_key_line(&line.text, key))
            .count()
    }

    /// Append `token` to the first `key=` line, or add `key=token` at the end.
    ///
    /// A new line takes the terminator style of the current last line.
    pub fn append_token(&mut self, key: &str, token: &str) -> KeyLineChange {
        match self.find_key_line(key) {
            Some(index) => {
                let text = &mut self.lines[index].text;
                text.push(KEY_SEPARATOR as u8);
                text.extend_from_slice(token.as_bytes());
                KeyLineChange::Extended { index }
            }
            None => {
                let crlf = self.lines.last().is_some_and(|line| line.crlf);
                self.lines.push(Line {
                    text: format!("{}={}", key, token).into_bytes(),
                    crlf,
                });
                KeyLineChange::Appended {
                    index: self.lines.len() - 1,
                }
            }
        }
    }

    /// Keys listed on the first `key=` line, trimmed, empty entries dropped.
    ///
    /// Non-UTF-8 bytes in the value are replaced with U+FFFD.
    pub fn key_values(&self, key: &str) -> Vec<String> {
        let Some(index) = self.find_key_line(key) else {
            return Vec::new();
        };
        String::from_utf8_lossy(&self.lines[index].text[key.len() + 1..])
            .split(KEY_SEPARATOR)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Serialize every line followed by its own terminator (`\n` or `\r\n`).
    ///
    /// A final line that had no terminator gains one.
    pub fn render(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(self.lines.iter().map(|l| l.text.len() + 2).sum());
        for line in &self.lines {
            out.extend_from_slice(&line.text);
            if line.crlf {
                out.push(b'\r');
            }
            out.push(b'\n');
        }
        out
    }
}

fn is_key_line(text: &[u8], key: &str) -> bool {
    text.strip_prefix(key.as_bytes())
        .is_some_and(|rest| rest.first() == Some(&b'='))
}
