//! Low-level SMTP stream handling.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::{Config, Framing};
use crate::error::{Error, Result};
use crate::types::Reply;

/// Maximum transport line length to prevent memory exhaustion.
const MAX_LINE_LENGTH: usize = 1024 * 1024; // 1 MB

/// Line-oriented SMTP stream over any async byte stream.
///
/// Owns the underlying connection; dropping it closes the socket.
#[derive(Debug)]
pub struct SmtpStream<S> {
    reader: BufReader<S>,
    framing: Framing,
    io_timeout: Option<Duration>,
}

impl<S> SmtpStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a stream, reading replies with the given framing strategy.
    pub fn new(stream: S, framing: Framing) -> Self {
        Self {
            reader: BufReader::new(stream),
            framing,
            io_timeout: None,
        }
    }

    /// Bounds every subsequent read and write by `timeout`.
    #[must_use]
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = Some(timeout);
        self
    }

    /// Writes one command followed by CRLF and flushes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or times out.
    pub async fn write_command(&mut self, text: &str) -> Result<()> {
        let mut data = Vec::with_capacity(text.len() + 2);
        data.extend_from_slice(text.as_bytes());
        data.extend_from_slice(b"\r\n");

        let stream = self.reader.get_mut();
        within(self.io_timeout, async {
            stream.write_all(&data).await?;
            stream.flush().await
        })
        .await
    }

    /// Reads one reply as delimited by the framing strategy.
    ///
    /// End of stream also ends the reply, so a closed connection yields
    /// whatever was collected so far (possibly nothing).
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails, times out, or a line exceeds the
    /// maximum length.
    pub async fn read_reply(&mut self) -> Result<Reply> {
        let limit = self.io_timeout;
        let framing = self.framing;
        let reader = &mut self.reader;

        let lines = within_result(limit, async move {
            let mut lines = Vec::new();
            while let Some(line) = read_line(reader).await? {
                tracing::trace!(%line, "S:");
                if framing.push(&mut lines, line) {
                    break;
                }
            }
            Ok(lines)
        })
        .await?;

        Ok(Reply::new(lines))
    }

    /// Shuts down the write half of the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown fails.
    pub async fn shutdown(&mut self) -> Result<()> {
        let stream = self.reader.get_mut();
        within(self.io_timeout, stream.shutdown()).await
    }
}

/// Connects to an SMTP server over plain TCP.
///
/// # Errors
///
/// Returns an error if the connection fails or times out.
pub async fn connect(config: &Config) -> Result<SmtpStream<TcpStream>> {
    let target = config.target();
    let stream = within(Some(config.connect_timeout), TcpStream::connect(&target)).await?;
    Ok(SmtpStream::new(stream, config.framing).with_io_timeout(config.io_timeout))
}

/// Reads a single LF-terminated line, stripping the CR/LF terminator.
///
/// Returns `None` at end of stream when no byte was read.
async fn read_line<R>(reader: &mut BufReader<R>) -> Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    let mut line = Vec::new();

    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            if line.is_empty() {
                return Ok(None);
            }
            break;
        }

        if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            line.extend_from_slice(&buf[..pos]);
            reader.consume(pos + 1);
            break;
        }

        let len = buf.len();
        line.extend_from_slice(buf);
        reader.consume(len);

        if line.len() > MAX_LINE_LENGTH {
            return Err(Error::Protocol("line too long".to_string()));
        }
    }

    if line.last() == Some(&b'\r') {
        line.pop();
    }

    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

/// Runs an I/O future under an optional deadline.
async fn within<T, F>(limit: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    within_result(limit, async { fut.await.map_err(Error::from) }).await
}

async fn within_result<T, F>(limit: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::Timeout(limit))?,
        None => fut.await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_write_command_appends_crlf() {
        let mock = Builder::new().write(b"EHLO example.com\r\n").build();
        let mut stream = SmtpStream::new(mock, Framing::MultiLine);

        stream.write_command("EHLO example.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_read_single_line_reply() {
        let mock = Builder::new().read(b"220 mail.example.com ready\r\n").build();
        let mut stream = SmtpStream::new(mock, Framing::MultiLine);

        let reply = stream.read_reply().await.unwrap();
        assert_eq!(reply.text(), "220 mail.example.com ready");
    }

    #[tokio::test]
    async fn test_read_multi_line_reply() {
        let mock = Builder::new()
            .read(b"250-mail.example.com\r\n250-SIZE 1000\r\n")
            .read(b"250 HELP\r\n")
            .build();
        let mut stream = SmtpStream::new(mock, Framing::MultiLine);

        let reply = stream.read_reply().await.unwrap();
        let expected = ["250-mail.example.com", "250-SIZE 1000", "250 HELP"];
        assert_eq!(reply, Reply::new(expected.map(String::from).to_vec()));
    }

    #[tokio::test]
    async fn test_read_blank_line_framing() {
        let mock = Builder::new()
            .read(b"250-mail.example.com\r\n250 HELP\r\n\r\n")
            .build();
        let mut stream = SmtpStream::new(mock, Framing::BlankLine);

        let reply = stream.read_reply().await.unwrap();
        assert_eq!(reply.text(), "250-mail.example.com250 HELP");
    }

    #[tokio::test]
    async fn test_read_bare_lf_and_eof() {
        let mock = Builder::new().read(b"250 OK\n221 Bye").build();
        let mut stream = SmtpStream::new(mock, Framing::BlankLine);

        let reply = stream.read_reply().await.unwrap();
        assert_eq!(reply, Reply::new(vec!["250 OK".into(), "221 Bye".into()]));
    }

    #[tokio::test]
    async fn test_read_after_close_is_empty() {
        let mock = Builder::new().build();
        let mut stream = SmtpStream::new(mock, Framing::MultiLine);

        let reply = stream.read_reply().await.unwrap();
        assert_eq!(reply, Reply::default());
    }

    #[tokio::test]
    async fn test_line_length_limit() {
        let long_line = "A".repeat(MAX_LINE_LENGTH + 100);
        let mock = Builder::new().read(long_line.as_bytes()).build();
        let mut stream = SmtpStream::new(mock, Framing::MultiLine);

        let result = stream.read_reply().await;
        assert!(result.unwrap_err().to_string().contains("line too long"));
    }

    #[tokio::test]
    async fn test_read_error_propagates() {
        let mock = Builder::new()
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let mut stream = SmtpStream::new(mock, Framing::MultiLine);

        let err = stream.read_reply().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_timeout() {
        // The server half stays open and silent.
        let (client, _server) = tokio::io::duplex(64);
        let mut stream =
            SmtpStream::new(client, Framing::BlankLine).with_io_timeout(Duration::from_secs(1));

        let err = stream.read_reply().await.unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_secs(1)));
    }
}
