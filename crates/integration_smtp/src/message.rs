//! RFC 5322 message rendering

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};

use crate::SmtpError;

/// A plain-text message ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

impl OutgoingEmail {
    /// Create a message
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Reject recipients and subjects that could break the header block
    pub fn validate(&self) -> Result<(), SmtpError> {
        validate_address(&self.to)?;
        if has_line_break(&self.subject) {
            return Err(SmtpError::Protocol(
                "subject must not contain line breaks".to_string(),
            ));
        }
        Ok(())
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains('\r') || value.contains('\n')
}

/// Check that an address is usable in an envelope command
pub fn validate_address(address: &str) -> Result<(), SmtpError> {
    let trimmed = address.trim();
    let well_formed = !trimmed.is_empty()
        && !has_line_break(address)
        && !trimmed.contains(['<', '>', ' '])
        && trimmed
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if well_formed {
        Ok(())
    } else {
        Err(SmtpError::InvalidAddress(address.to_string()))
    }
}

/// Domain part of an address, used for the Message-ID
pub fn extract_domain(address: &str) -> &str {
    address
        .split_once('@')
        .map_or("localhost", |(_, domain)| domain)
}

/// Encode a header value as an RFC 2047 encoded-word when it is not ASCII
pub fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", BASE64.encode(value.as_bytes()))
    }
}

/// Normalize line endings to CRLF and dot-stuff lines starting with '.'
pub fn prepare_body(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 16);
    for (i, line) in body.split('\n').enumerate() {
        if i > 0 {
            out.push_str("\r\n");
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.starts_with('.') {
            out.push('.');
        }
        out.push_str(line);
    }
    out
}

/// Render headers and body into the DATA payload (without the terminator)
pub fn render(
    email: &OutgoingEmail,
    from_address: &str,
    from_name: Option<&str>,
    message_id: &str,
    date: DateTime<Utc>,
) -> String {
    let from = match from_name.filter(|n| !n.trim().is_empty()) {
        Some(name) => format!("{} <{from_address}>", encode_header(name.trim())),
        None => from_address.to_string(),
    };

    format!(
        "From: {from}\r\n\
         To: {to}\r\n\
         Subject: {subject}\r\n\
         Date: {date}\r\n\
         Message-ID: {message_id}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         Content-Transfer-Encoding: 8bit\r\n\
         \r\n\
         {body}",
        to = email.to.trim(),
        subject = encode_header(&email.subject),
        date = date.to_rfc2822(),
        body = prepare_body(&email.body),
    )
}
