//! One-shot SMTP session driving the submission dialogue.

use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

use super::{Config, SmtpStream, Validation, connect};
use crate::command::Command;
use crate::error::{Error, Result};
use crate::message::{build_payload, extract_terminator};
use crate::types::{Address, HeaderSet, Reply, ReplyCode};

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every recipient was accepted.
    Delivered,
    /// The message went out, but some recipients were refused with 550.
    PartiallyDelivered {
        /// Refused addresses, in input order.
        rejected: Vec<String>,
    },
}

impl Outcome {
    fn from_rejected(rejected: Vec<String>) -> Self {
        if rejected.is_empty() {
            Self::Delivered
        } else {
            Self::PartiallyDelivered { rejected }
        }
    }

    /// Returns the refused recipients (empty when all were accepted).
    #[must_use]
    pub fn rejected(&self) -> &[String] {
        match self {
            Self::Delivered => &[],
            Self::PartiallyDelivered { rejected } => rejected,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => {
                f.write_str("The email was successfully sent to all recipient(s).")
            }
            Self::PartiallyDelivered { rejected } => write!(
                f,
                "The email was successfully sent. However, {} recipient(s) was(ere) invalid ({})",
                rejected.len(),
                rejected.join(" ; ")
            ),
        }
    }
}

/// Sender and recipients derived from the header set.
#[derive(Debug)]
struct Envelope {
    from: Address,
    recipients: Vec<String>,
}

impl Envelope {
    fn from_headers(headers: &HeaderSet) -> Result<Self> {
        let envelope = Self {
            from: headers.sender()?,
            recipients: headers.recipients()?,
        };
        headers.check_line_breaks()?;
        Ok(envelope)
    }
}

/// SMTP session owning one connection for one message.
///
/// [`Session::send_email`] consumes the session; the connection is closed
/// when it returns, whatever the outcome.
#[derive(Debug)]
pub struct Session<S> {
    stream: SmtpStream<S>,
    validation: Validation,
}

impl Session<TcpStream> {
    /// Opens a TCP connection to the configured server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established in time.
    pub async fn connect(config: &Config) -> Result<Self> {
        debug!(server = %config.target(), "connecting");
        let stream = connect(config).await?;
        Ok(Self::new(stream, config.validation))
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a session over an already wrapped stream.
    pub const fn new(stream: SmtpStream<S>, validation: Validation) -> Self {
        Self { stream, validation }
    }

    /// Creates a session over a raw stream, using the framing, timeout and
    /// validation settings of `config`.
    pub fn from_stream(stream: S, config: &Config) -> Self {
        let stream = SmtpStream::new(stream, config.framing).with_io_timeout(config.io_timeout);
        Self::new(stream, config.validation)
    }

    /// Submits one message.
    ///
    /// Runs greeting, EHLO, MAIL FROM, one RCPT TO per `To:` address, DATA,
    /// the message and QUIT. If every recipient is refused the transaction
    /// is reset and the session quits before reporting the failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the headers lack a sender or recipients or carry a
    /// line break in a value, on any transport failure, on a greeting other than 220, when all recipients
    /// are refused, or when the DATA reply announces no terminator.
    pub async fn send_email(self, headers: &HeaderSet, body: &str) -> Result<Outcome> {
        let envelope = Envelope::from_headers(headers)?;
        self.deliver(envelope, headers, body).await
    }

    async fn deliver(
        mut self,
        envelope: Envelope,
        headers: &HeaderSet,
        body: &str,
    ) -> Result<Outcome> {
        self.greet().await?;
        self.ehlo(&envelope.from).await?;
        self.mail_from(envelope.from).await?;

        let rejected = self.rcpt_to_all(&envelope.recipients).await?;
        if rejected.len() == envelope.recipients.len() {
            return self.abort(rejected).await;
        }

        let terminator = self.data().await?;
        self.transmit(headers, body, &terminator).await?;
        self.finish(rejected).await
    }

    async fn greet(&mut self) -> Result<()> {
        let greeting = self.stream.read_reply().await?;
        debug!(reply = %greeting, "greeting");
        if !greeting.has_code(ReplyCode::SERVICE_READY) {
            return Err(Error::UnexpectedGreeting(greeting.text()));
        }
        Ok(())
    }

    async fn ehlo(&mut self, from: &Address) -> Result<()> {
        let cmd = Command::Ehlo {
            domain: from.domain().to_string(),
        };
        let reply = self.exchange(&cmd).await?;
        self.check(&cmd, &reply)
    }

    async fn mail_from(&mut self, from: Address) -> Result<()> {
        let cmd = Command::MailFrom { from };
        let reply = self.exchange(&cmd).await?;
        self.check(&cmd, &reply)
    }

    /// Declares every recipient and returns the refused ones, in order.
    async fn rcpt_to_all(&mut self, recipients: &[String]) -> Result<Vec<String>> {
        let mut rejected = Vec::new();
        for to in recipients {
            let cmd = Command::RcptTo { to: to.clone() };
            let reply = self.exchange(&cmd).await?;

            let refused = match self.validation {
                Validation::Lenient => reply.has_code(ReplyCode::MAILBOX_UNAVAILABLE),
                Validation::Strict => !reply.is_success(),
            };
            if refused {
                warn!(recipient = %to, reply = %reply, "recipient refused");
                rejected.push(to.clone());
            }
        }
        Ok(rejected)
    }

    /// Sends DATA and returns the terminator the server announced.
    async fn data(&mut self) -> Result<String> {
        let reply = self.exchange(&Command::Data).await?;
        extract_terminator(&reply).ok_or_else(|| Error::TerminatorNotFound(reply.text()))
    }

    async fn transmit(
        &mut self,
        headers: &HeaderSet,
        body: &str,
        terminator: &str,
    ) -> Result<()> {
        let cmd = Command::Payload(build_payload(headers, body, terminator));
        let ack = self.exchange(&cmd).await?;
        self.check(&cmd, &ack)
    }

    /// Normal exit: QUIT, close, report.
    async fn finish(mut self, rejected: Vec<String>) -> Result<Outcome> {
        let reply = self.exchange(&Command::Quit).await?;
        self.check(&Command::Quit, &reply)?;
        self.close().await;

        let outcome = Outcome::from_rejected(rejected);
        info!(rejected = outcome.rejected().len(), "message submitted");
        Ok(outcome)
    }

    /// Abort exit: RSET, QUIT, close, then fail with the refused list.
    async fn abort(mut self, rejected: Vec<String>) -> Result<Outcome> {
        self.exchange(&Command::Rset).await?;
        self.exchange(&Command::Quit).await?;
        self.close().await;
        Err(Error::AllRecipientsRejected(rejected))
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "shutdown after QUIT failed");
        }
    }

    /// Writes one command and reads its reply.
    async fn exchange(&mut self, cmd: &Command) -> Result<Reply> {
        if let Command::Payload(payload) = cmd {
            debug!(bytes = payload.len(), "C: message data");
            trace!(%payload, "C:");
        } else {
            debug!(command = %cmd, "C:");
        }
        self.stream.write_command(&cmd.to_string()).await?;

        let reply = self.stream.read_reply().await?;
        debug!(reply = %reply, "S:");
        Ok(reply)
    }

    /// Applies the validation policy to a step's reply.
    fn check(&self, cmd: &Command, reply: &Reply) -> Result<()> {
        match self.validation {
            Validation::Lenient => Ok(()),
            Validation::Strict if reply.is_success() => Ok(()),
            Validation::Strict => Err(Error::rejected(cmd.verb(), reply.text())),
        }
    }
}

/// Connects to the configured server and submits one message.
///
/// Header problems are reported before any connection is opened.
///
/// # Errors
///
/// See [`Session::send_email`]; connection failures are reported as
/// transport errors.
pub async fn send_email(config: &Config, headers: &HeaderSet, body: &str) -> Result<Outcome> {
    let envelope = Envelope::from_headers(headers)?;
    let session = Session::connect(config).await?;
    session.deliver(envelope, headers, body).await
}
