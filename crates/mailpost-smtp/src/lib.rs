//! # mailpost-smtp
//!
//! A minimal SMTP client that submits one email over a plaintext TCP
//! connection.
//!
//! The session runs a fixed dialogue: greeting, `EHLO`, `MAIL FROM`, one
//! `RCPT TO` per recipient, `DATA`, the message, `QUIT`. Recipients refused
//! with 550 are skipped; if all of them are refused the transaction is reset
//! and the session quits before failing.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailpost_smtp::{Config, HeaderSet, headers};
//!
//! #[tokio::main]
//! async fn main() -> mailpost_smtp::Result<()> {
//!     let config = Config::builder("localhost").port(2525).build();
//!     let headers = HeaderSet::new()
//!         .with(headers::FROM, "alice@example.com")
//!         .with(headers::TO, "bob@example.org;carol@example.net")
//!         .with(headers::SUBJECT, "Hello");
//!
//!     let outcome = mailpost_smtp::send_email(&config, &headers, "Hi there").await?;
//!     println!("{outcome}");
//!     Ok(())
//! }
//! ```
//!
//! ## Reply framing
//!
//! [`Framing::MultiLine`] follows RFC 5321 continuation lines.
//! [`Framing::BlankLine`] treats everything up to an empty line as one reply,
//! for servers that delimit their replies that way.
//!
//! ## Modules
//!
//! - [`command`]: SMTP command rendering
//! - [`connection`]: Configuration, framing, stream and session
//! - [`message`]: DATA terminator and payload
//! - [`types`]: Addresses, header set, replies

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod message;
pub mod types;

pub use connection::{
    Config, ConfigBuilder, Framing, Outcome, Session, SmtpStream, Validation, send_email,
};
pub use error::{Error, Result};
pub use types::{Address, HeaderSet, Reply, ReplyCode, headers};
