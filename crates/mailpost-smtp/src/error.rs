//! Error types for SMTP submission.

use std::io;
use std::time::Duration;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a submission can fail.
///
/// Every variant renders to a message suitable for showing to a user as-is.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error while connecting or talking to the server.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Connect, read or write did not complete in time.
    #[error("Timed out after {0:?} waiting for the server")]
    Timeout(Duration),

    /// Transport-level protocol violation (e.g. an oversized line).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server greeting did not carry status 220.
    #[error("Unexpected server greeting: {0}")]
    UnexpectedGreeting(String),

    /// Every declared recipient was refused with status 550.
    ///
    /// The session has already been reset and closed when this is returned.
    #[error(
        "All recipients are invalid ({}) -> process exited and mail drop request aborted!",
        .0.join(" ; ")
    )]
    AllRecipientsRejected(Vec<String>),

    /// The reply to DATA did not announce an end-of-data terminator.
    #[error("No ending character was found in the DATA reply: {0}")]
    TerminatorNotFound(String),

    /// A reply was refused under strict validation.
    #[error("{step} rejected by server: {reply}")]
    Rejected {
        /// Dialogue step that was refused (e.g. `MAIL FROM`).
        step: &'static str,
        /// Server reply text.
        reply: String,
    },

    /// A required header is absent from the header set.
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// A header value contains a line break.
    #[error("Header {0} must not contain a line break")]
    InvalidHeader(String),

    /// The `To:` header produced no recipient address.
    #[error("No recipients specified")]
    NoRecipients,
}

impl Error {
    /// Creates a strict-validation rejection for the given step.
    #[must_use]
    pub fn rejected(step: &'static str, reply: impl Into<String>) -> Self {
        Self::Rejected {
            step,
            reply: reply.into(),
        }
    }

    /// Returns true if the failure happened at the transport level.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Timeout(_) | Self::Protocol(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn all_rejected_lists_addresses() {
        let err = Error::AllRecipientsRejected(vec!["a@x.com".into(), "b@y.com".into()]);
        assert_eq!(
            err.to_string(),
            "All recipients are invalid (a@x.com ; b@y.com) -> process exited and mail drop request aborted!"
        );
    }

    #[test]
    fn greeting_carries_server_text() {
        let err = Error::UnexpectedGreeting("554 no service".into());
        assert!(err.to_string().contains("554 no service"));
    }

    #[test]
    fn rejected_names_step() {
        let err = Error::rejected("MAIL FROM", "553 sender refused");
        assert_eq!(err.to_string(), "MAIL FROM rejected by server: 553 sender refused");
    }

    #[test]
    fn classification() {
        let io = Error::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        assert!(io.is_transport());
        assert!(Error::Timeout(Duration::from_secs(1)).is_transport());
        assert!(!Error::NoRecipients.is_transport());
        assert!(!Error::TerminatorNotFound(String::new()).is_transport());
    }
}
