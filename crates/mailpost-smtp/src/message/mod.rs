//! DATA phase: terminator discovery and payload construction.

use crate::types::{HeaderSet, Reply};

/// Text a 354 reply must contain; the terminator follows it.
pub const START_INPUT_PREFIX: &str = "354 Start Mail input; end with ";

/// Extracts the end-of-data terminator announced in a reply to DATA.
///
/// The prefix may appear anywhere in the reply text; the terminator is
/// everything after it, byte for byte, and may be empty. Returns `None`
/// only when the prefix is absent.
#[must_use]
pub fn extract_terminator(reply: &Reply) -> Option<String> {
    let text = reply.text();
    let start = text.find(START_INPUT_PREFIX)? + START_INPUT_PREFIX.len();
    Some(text[start..].to_string())
}

/// Builds the message payload sent after DATA.
///
/// Layout: rendered headers, CRLF, a `.` line, the body, CRLF, the
/// terminator, CRLF. The `.` line is always sent, whatever terminator the
/// server announced.
#[must_use]
pub fn build_payload(headers: &HeaderSet, body: &str, terminator: &str) -> String {
    let rendered = headers.render();
    let mut payload =
        String::with_capacity(rendered.len() + body.len() + terminator.len() + 9);
    payload.push_str(&rendered);
    payload.push_str("\r\n");
    payload.push_str(".\r\n");
    payload.push_str(body);
    payload.push_str("\r\n");
    payload.push_str(terminator);
    payload.push_str("\r\n");
    payload
}
