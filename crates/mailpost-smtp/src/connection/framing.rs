//! Reply framing strategies.
//!
//! A framing strategy decides which transport lines belong to one reply.
//! The stream feeds it lines one at a time and stops reading as soon as the
//! strategy reports the reply complete (or the peer closes the stream).

/// Rule deciding where a reply ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// RFC 5321 multi-line replies: `250-...` lines continue the reply and
    /// the first line without a dash after the code ends it. Empty lines
    /// are ignored.
    #[default]
    MultiLine,
    /// Every non-empty line belongs to the reply until an empty line is
    /// read.
    ///
    /// Servers that never send an empty line after a reply will leave the
    /// reader waiting until the I/O timeout fires.
    BlankLine,
}

impl Framing {
    /// Feeds one transport line (terminator already stripped).
    ///
    /// Lines that belong to the reply are appended to `lines`. Returns true
    /// once the reply is complete.
    pub fn push(self, lines: &mut Vec<String>, line: String) -> bool {
        match self {
            Self::BlankLine => {
                if line.is_empty() {
                    return true;
                }
                lines.push(line);
                false
            }
            Self::MultiLine => {
                if line.is_empty() {
                    return false;
                }
                let last = !is_continuation_line(&line);
                lines.push(line);
                last
            }
        }
    }
}

/// Checks if a line announces more lines of the same reply (`250-...`).
#[must_use]
pub fn is_continuation_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 4 && bytes[..3].iter().all(u8::is_ascii_digit) && bytes[3] == b'-'
}
