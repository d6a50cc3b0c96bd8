//! Outgoing mail construction.
//!
//! Builds minimal RFC 5322 plain-text messages for the Gmail send endpoint.
//! Header values are sanitized against CRLF injection, and replies carry the
//! `In-Reply-To`/`References` headers Gmail needs for threading.

/// A plain-text message to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailDraft {
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
    pub body: String,
    /// Message-ID of the message being replied to, if any.
    pub in_reply_to: Option<String>,
    /// Accumulated References header for the thread, if any.
    pub references: Option<String>,
}

impl MailDraft {
    /// Creates a fresh (non-reply) draft.
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            cc: None,
            subject: subject.into(),
            body: body.into(),
            in_reply_to: None,
            references: None,
        }
    }

    /// Sets the Cc header.
    #[must_use]
    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    /// Marks this draft as a reply to the given Message-ID, extending the
    /// References chain.
    #[must_use]
    pub fn in_reply_to(mut self, message_id: impl Into<String>, references: Option<&str>) -> Self {
        let message_id = message_id.into();
        self.references = Some(match references {
            Some(existing) => format!("{} {}", existing, message_id),
            None => message_id.clone(),
        });
        self.in_reply_to = Some(message_id);
        self
    }

    /// Renders the draft as an RFC 5322 message.
    pub fn to_rfc5322(&self) -> String {
        let mut message = String::new();
        message.push_str(&format!("To: {}\r\n", sanitize_header(&self.to)));
        if let Some(ref cc) = self.cc {
            message.push_str(&format!("Cc: {}\r\n", sanitize_header(cc)));
        }
        message.push_str(&format!("Subject: {}\r\n", sanitize_header(&self.subject)));
        if let Some(ref in_reply_to) = self.in_reply_to {
            message.push_str(&format!("In-Reply-To: {}\r\n", sanitize_header(in_reply_to)));
        }
        if let Some(ref references) = self.references {
            message.push_str(&format!("References: {}\r\n", sanitize_header(references)));
        }
        message.push_str("MIME-Version: 1.0\r\n");
        message.push_str("Content-Type: text/plain; charset=\"UTF-8\"\r\n");
        message.push_str("\r\n");
        message.push_str(&self.body);
        message
    }
}

/// Collapses CR/LF in a header value so user input cannot inject headers.
fn sanitize_header(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// Prefixes `Re: ` unless the subject already carries it.
pub fn reply_subject(original: &str) -> String {
    let trimmed = original.trim();
    if trimmed.to_ascii_lowercase().starts_with("re:") {
        trimmed.to_string()
    } else {
        format!("Re: {}", trimmed)
    }
}
