//! `mailpost` - submit one email to an SMTP server over plaintext TCP.
//!
//! Collects the server target, headers and body from the command line (body
//! from stdin when not given), checks that nothing is empty, runs one SMTP
//! session and prints the result.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod form;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use form::{Form, Settings};
use mailpost_smtp::connection::DEFAULT_PORT;
use mailpost_smtp::{Framing, Outcome, Validation};

/// Send one email over plaintext SMTP
#[derive(Parser, Debug)]
#[command(name = "mailpost", version, long_about = None)]
struct Cli {
    /// SMTP server hostname
    #[arg(long, env = "MAILPOST_HOST")]
    host: String,

    /// SMTP server port
    #[arg(long, env = "MAILPOST_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Sender address
    #[arg(long)]
    from: String,

    /// Recipient addresses, separated by ';'
    #[arg(long)]
    to: String,

    /// Subject line
    #[arg(long)]
    subject: String,

    /// Date header (defaults to the current local time)
    #[arg(long)]
    date: Option<String>,

    /// Message body (read from stdin when omitted)
    #[arg(long)]
    body: Option<String>,

    /// How server replies are delimited
    #[arg(long, value_enum, default_value_t = FramingArg::MultiLine)]
    framing: FramingArg,

    /// Require a success code for every step instead of only the greeting
    #[arg(long)]
    strict: bool,

    /// Connection timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    connect_timeout: u64,

    /// Read/write timeout in seconds
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    io_timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FramingArg {
    /// RFC 5321 multi-line replies
    MultiLine,
    /// Replies end at an empty line
    BlankLine,
}

impl From<FramingArg> for Framing {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::MultiLine => Self::MultiLine,
            FramingArg::BlankLine => Self::BlankLine,
        }
    }
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            framing: self.framing.into(),
            validation: if self.strict {
                Validation::Strict
            } else {
                Validation::Lenient
            },
            connect_timeout: Duration::from_secs(self.connect_timeout),
            io_timeout: Duration::from_secs(self.io_timeout),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailpost=info,mailpost_smtp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let body = match &cli.body {
        Some(body) => body.clone(),
        None => read_stdin().await?,
    };
    let date = cli
        .date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().to_rfc2822());

    let form = Form::new(
        &cli.host,
        cli.port,
        &cli.from,
        &cli.to,
        &cli.subject,
        &date,
        &body,
    );
    form.validate()?;
    debug!(?form, "form accepted");

    let config = form.config(&cli.settings());
    info!(server = %config.target(), "sending email");

    let outcome = mailpost_smtp::send_email(&config, &form.headers(), &form.body)
        .await
        .context("failed to send the email")?;
    Ok(outcome)
}

async fn read_stdin() -> Result<String> {
    let mut body = String::new();
    tokio::io::stdin()
        .read_to_string(&mut body)
        .await
        .context("failed to read the message body from stdin")?;
    Ok(body)
}
