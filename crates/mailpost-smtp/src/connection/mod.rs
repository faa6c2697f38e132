//! SMTP connection management: configuration, reply framing, the stream and
//! the session that drives the submission dialogue.

mod config;
mod framing;
mod session;
mod stream;

pub use config::{Config, ConfigBuilder, DEFAULT_PORT, Validation};
pub use framing::{Framing, is_continuation_line};
pub use session::{Outcome, Session, send_email};
pub use stream::{SmtpStream, connect};
