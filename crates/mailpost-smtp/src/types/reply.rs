//! SMTP reply types.

/// One collected server reply.
///
/// A reply is assembled from one or more transport lines (terminators
/// stripped). Its text is the lines concatenated without a separator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    lines: Vec<String>,
}

impl Reply {
    /// Creates a reply from its transport lines.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec is not const-compatible
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Returns the full reply text.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.concat()
    }

    /// Returns the status code, if the reply starts with three digits.
    #[must_use]
    pub fn code(&self) -> Option<ReplyCode> {
        let first = self.lines.first()?;
        let digits = first.get(..3)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(ReplyCode::new)
    }

    /// Returns true if the reply starts with the given status code.
    #[must_use]
    pub fn has_code(&self, code: ReplyCode) -> bool {
        self.code() == Some(code)
    }

    /// Returns true if this is a success reply (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code().is_some_and(ReplyCode::is_success)
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns true if this is a success code (2xx).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Codes the dialogue looks at
impl ReplyCode {
    /// 220 Service ready
    pub const SERVICE_READY: Self = Self(220);
    /// 550 Mailbox unavailable (not found, access denied)
    pub const MAILBOX_UNAVAILABLE: Self = Self(550);
}
