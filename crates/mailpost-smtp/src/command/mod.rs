//! SMTP command builder.
//!
//! Commands render without their line terminator; the stream appends CRLF
//! when writing them.

use std::fmt;

use crate::types::Address;

/// SMTP command issued by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// EHLO - Extended greeting
    Ehlo {
        /// Domain we introduce ourselves as
        domain: String,
    },
    /// MAIL FROM - Start mail transaction
    MailFrom {
        /// Sender address
        from: Address,
    },
    /// RCPT TO - Add recipient
    RcptTo {
        /// Recipient address, sent as given
        to: String,
    },
    /// DATA - Begin message data
    Data,
    /// Message content sent after a 354 reply
    Payload(String),
    /// RSET - Reset transaction
    Rset,
    /// QUIT - Close connection
    Quit,
}

impl Command {
    /// Returns the command verb, used to name dialogue steps.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Ehlo { .. } => "EHLO",
            Self::MailFrom { .. } => "MAIL FROM",
            Self::RcptTo { .. } => "RCPT TO",
            Self::Data => "DATA",
            Self::Payload(_) => "message data",
            Self::Rset => "RSET",
            Self::Quit => "QUIT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ehlo { domain } => write!(f, "EHLO {domain}"),
            Self::MailFrom { from } => write!(f, "MAIL FROM <{from}>"),
            Self::RcptTo { to } => write!(f, "RCPT TO: <{to}>"),
            Self::Data => f.write_str("DATA"),
            Self::Payload(payload) => f.write_str(payload),
            Self::Rset => f.write_str("RSET"),
            Self::Quit => f.write_str("QUIT"),
        }
    }
}
