//! Submission form: the values a user supplies for one email.

use std::time::Duration;

use anyhow::{Result, bail};
use mailpost_smtp::{Config, Framing, HeaderSet, Validation, headers};

/// Values collected for one submission, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// Sender address.
    pub from: String,
    /// Recipients separated by `;`.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Date header value.
    pub date: String,
    /// Message body.
    pub body: String,
}

impl Form {
    /// Creates a form, trimming every text value.
    #[must_use]
    pub fn new(
        host: &str,
        port: u16,
        from: &str,
        to: &str,
        subject: &str,
        date: &str,
        body: &str,
    ) -> Self {
        Self {
            host: host.trim().to_string(),
            port,
            from: from.trim().to_string(),
            to: to.trim().to_string(),
            subject: subject.trim().to_string(),
            date: date.trim().to_string(),
            body: body.trim().to_string(),
        }
    }

    /// Checks that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("server host", &self.host),
            ("from", &self.from),
            ("to", &self.to),
            ("subject", &self.subject),
            ("date", &self.date),
            ("body", &self.body),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                bail!("the {name} field must not be empty");
            }
        }
        if self.port == 0 {
            bail!("the server port must not be 0");
        }
        Ok(())
    }

    /// Builds the header set in form order: From, To, Subject, Date.
    #[must_use]
    pub fn headers(&self) -> HeaderSet {
        HeaderSet::new()
            .with(headers::FROM, &self.from)
            .with(headers::TO, &self.to)
            .with(headers::SUBJECT, &self.subject)
            .with(headers::DATE, &self.date)
    }

    /// Builds the connection configuration for this form's server.
    #[must_use]
    pub fn config(&self, settings: &Settings) -> Config {
        Config::builder(&self.host)
            .port(self.port)
            .framing(settings.framing)
            .validation(settings.validation)
            .connect_timeout(settings.connect_timeout)
            .io_timeout(settings.io_timeout)
            .build()
    }
}

/// Transport settings chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Reply framing strategy.
    pub framing: Framing,
    /// Reply checking policy.
    pub validation: Validation,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Read/write timeout.
    pub io_timeout: Duration,
}
