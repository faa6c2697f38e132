//! Message header set.

use crate::error::{Error, Result};
use crate::types::Address;

/// Name of the sender header.
pub const FROM: &str = "From:";
/// Name of the recipient header.
pub const TO: &str = "To:";
/// Name of the subject header.
pub const SUBJECT: &str = "Subject:";
/// Name of the date header.
pub const DATE: &str = "Date:";

/// Separator between addresses inside the `To:` value.
pub const RECIPIENT_SEPARATOR: char = ';';

/// Ordered header set with unique names.
///
/// Names are stored as given, colon included (`From:`), and rendered as
/// `<name> <value>` in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    /// Creates an empty header set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a header.
    ///
    /// An existing header with the same name keeps its position and gets the
    /// new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`HeaderSet::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the value of a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no header is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the envelope sender taken from `From:`.
    ///
    /// # Errors
    ///
    /// Returns an error if `From:` is missing or not a valid address.
    pub fn sender(&self) -> Result<Address> {
        let from = self.get(FROM).ok_or(Error::MissingHeader(FROM))?;
        Address::new(from.trim())
    }

    /// Returns the envelope recipients taken from `To:`, in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if `To:` is missing, yields no address, or an
    /// address contains a line break.
    pub fn recipients(&self) -> Result<Vec<String>> {
        let to = self.get(TO).ok_or(Error::MissingHeader(TO))?;
        let recipients = split_recipients(to);
        if recipients.is_empty() {
            return Err(Error::NoRecipients);
        }
        if let Some(bad) = recipients.iter().find(|r| has_line_break(r)) {
            return Err(Error::InvalidAddress(format!(
                "{}: contains a line break",
                bad.escape_debug()
            )));
        }
        Ok(recipients)
    }

    /// Checks that no header value contains CR or LF.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] naming the first offending header.
    pub fn check_line_breaks(&self) -> Result<()> {
        match self.entries.iter().find(|(_, v)| has_line_break(v)) {
            Some((name, _)) => Err(Error::InvalidHeader(name.clone())),
            None => Ok(()),
        }
    }

    /// Renders the headers as `<name> <value>` lines joined by CRLF.
    ///
    /// No trailing CRLF is appended.
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{name} {value}"))
            .collect::<Vec<_>>()
            .join("\r\n")
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Splits a `To:` value into addresses.
///
/// Entries are kept as given, surrounding spaces and inner empty entries
/// included. Only trailing empty entries are dropped.
#[must_use]
pub fn split_recipients(value: &str) -> Vec<String> {
    let mut recipients: Vec<String> = value
        .split(RECIPIENT_SEPARATOR)
        .map(ToString::to_string)
        .collect();
    while recipients.last().is_some_and(String::is_empty) {
        recipients.pop();
    }
    recipients
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\r', '\n'])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn insert_keeps_order_and_replaces() {
        let mut headers = HeaderSet::new();
        headers.insert(FROM, "a@x.com");
        headers.insert(TO, "b@y.com");
        headers.insert(FROM, "c@z.com");

        let names: Vec<_> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec![FROM, TO]);
        assert_eq!(headers.get(FROM), Some("c@z.com"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn render_joins_with_crlf() {
        let headers = HeaderSet::new()
            .with(FROM, "a@x.com")
            .with(TO, "b@y.com")
            .with(SUBJECT, "Hello");
        assert_eq!(
            headers.render(),
            "From: a@x.com\r\nTo: b@y.com\r\nSubject: Hello"
        );
    }

    #[test]
    fn render_empty() {
        assert_eq!(HeaderSet::new().render(), "");
    }

    #[test]
    fn sender_and_recipients() {
        let headers: HeaderSet = [(FROM, "a@x.com"), (TO, "b@y.com;c@z.com")]
            .into_iter()
            .collect();
        assert_eq!(headers.sender().unwrap().domain(), "x.com");
        assert_eq!(headers.recipients().unwrap(), vec!["b@y.com", "c@z.com"]);
    }

    #[test]
    fn missing_headers() {
        let headers = HeaderSet::new().with(TO, "b@y.com");
        assert!(matches!(headers.sender(), Err(Error::MissingHeader(FROM))));

        let headers = HeaderSet::new().with(FROM, "a@x.com");
        assert!(matches!(headers.recipients(), Err(Error::MissingHeader(TO))));
    }

    #[test]
    fn blank_to_has_no_recipients() {
        for to in ["", ";", ";;"] {
            let headers = HeaderSet::new().with(TO, to);
            assert!(matches!(headers.recipients(), Err(Error::NoRecipients)));
        }
    }

    #[test]
    fn recipient_with_line_break_is_refused() {
        let headers = HeaderSet::new().with(TO, "b@y.com>\r\nRSET");
        assert!(matches!(headers.recipients(), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn header_value_with_line_break_is_refused() {
        let headers = HeaderSet::new()
            .with(FROM, "a@x.com")
            .with(SUBJECT, "Hi\r\nBcc: c@z.com");
        assert!(matches!(
            headers.check_line_breaks(),
            Err(Error::InvalidHeader(ref name)) if name == SUBJECT
        ));
        assert!(HeaderSet::new().with(FROM, "a@x.com").check_line_breaks().is_ok());
    }

    #[test]
    fn sender_without_domain() {
        let headers = HeaderSet::new().with(FROM, "nobody");
        assert!(matches!(headers.sender(), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn split_keeps_entries_as_given() {
        assert_eq!(
            split_recipients("b@y.com;; c@z.com"),
            vec!["b@y.com", "", " c@z.com"]
        );
    }

    #[test]
    fn split_drops_trailing_empty_entries() {
        assert_eq!(split_recipients("b@y.com;c@z.com;;"), vec!["b@y.com", "c@z.com"]);
        assert_eq!(split_recipients(" ; ;"), vec![" ", " "]);
    }

    proptest! {
        #[test]
        fn split_preserves_order(addrs in prop::collection::vec("[a-z]{1,8}@[a-z]{1,8}\\.com", 1..8)) {
            let joined = addrs.join(";");
            prop_assert_eq!(split_recipients(&joined), addrs);
        }
    }
}
