//! SMTP client implementation
//!
//! Speaks just enough of RFC 5321 to submit one plain-text message per
//! connection: greeting, EHLO, optional STARTTLS, AUTH PLAIN, envelope, DATA.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use secrecy::ExposeSecret;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
};
use tracing::{debug, error, info, instrument, trace};

use crate::{
    SmtpConfig, SmtpError, SmtpSecurity,
    message::{self, OutgoingEmail},
    tls::build_tls_connector,
};

/// Async SMTP mailer
#[derive(Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("from_address", &self.config.from_address)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Create a mailer, validating the configuration up front
    pub fn new(config: SmtpConfig) -> Result<Self, SmtpError> {
        config.validate().map_err(SmtpError::NotConfigured)?;
        Ok(Self { config })
    }

    /// The active configuration
    #[must_use]
    pub const fn config(&self) -> &SmtpConfig {
        &self.config
    }

    /// Submit a message, returning its Message-ID
    #[instrument(skip(self, email), fields(to = %email.to))]
    pub async fn send(&self, email: &OutgoingEmail) -> Result<String, SmtpError> {
        email.validate()?;

        let message_id = format!(
            "<{}.{}@{}>",
            Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4(),
            message::extract_domain(&self.config.from_address)
        );
        let content = message::render(
            email,
            &self.config.from_address,
            self.config.from_name.as_deref(),
            &message_id,
            Utc::now(),
        );

        let timeout_secs = self.config.timeout_secs;
        tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            self.deliver(email.to.trim(), &content),
        )
        .await
        .map_err(|_| SmtpError::Timeout { timeout_secs })??;

        info!(message_id = %message_id, "Message accepted by SMTP server");
        Ok(message_id)
    }

    /// Check that the server greets and accepts EHLO
    pub async fn check_connection(&self) -> Result<(), SmtpError> {
        let stream = self.connect().await?;
        let mut reader = BufReader::new(stream);
        expect_response(&mut reader, "220").await?;
        send_command(&mut reader, &format!("EHLO {}", ehlo_name())).await?;
        expect_response(&mut reader, "250").await?;
        send_command(&mut reader, "QUIT").await?;
        Ok(())
    }

    async fn connect(&self) -> Result<TcpStream, SmtpError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        TcpStream::connect(&addr).await.map_err(|e| {
            error!(error = %e, addr = %addr, "Failed to connect to SMTP server");
            SmtpError::ConnectionFailed(format!("SMTP connection failed: {e}"))
        })
    }

    async fn deliver(&self, to: &str, content: &str) -> Result<(), SmtpError> {
        let stream = self.connect().await?;

        match self.config.effective_security() {
            SmtpSecurity::Implicit => {
                let tls = build_tls_connector(&self.config.tls)?;
                let tls_stream = tls
                    .connect(&self.config.host, stream)
                    .await
                    .map_err(|e| SmtpError::ConnectionFailed(format!("TLS handshake failed: {e}")))?;
                self.session(tls_stream, true, to, content).await
            },
            SmtpSecurity::StartTls => self.starttls_session(stream, to, content).await,
            SmtpSecurity::Plain => self.session(stream, true, to, content).await,
        }
    }

    async fn starttls_session(
        &self,
        stream: TcpStream,
        to: &str,
        content: &str,
    ) -> Result<(), SmtpError> {
        let mut reader = BufReader::new(stream);

        expect_response(&mut reader, "220").await?;
        send_command(&mut reader, &format!("EHLO {}", ehlo_name())).await?;
        expect_response(&mut reader, "250").await?;
        send_command(&mut reader, "STARTTLS").await?;
        expect_response(&mut reader, "220").await?;

        let stream = reader.into_inner();
        let tls = build_tls_connector(&self.config.tls)?;
        let tls_stream = tls
            .connect(&self.config.host, stream)
            .await
            .map_err(|e| SmtpError::ConnectionFailed(format!("STARTTLS failed: {e}")))?;

        // No second greeting after the upgrade
        self.session(tls_stream, false, to, content).await
    }

    async fn session<S>(
        &self,
        stream: S,
        expect_greeting: bool,
        to: &str,
        content: &str,
    ) -> Result<(), SmtpError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(stream);

        if expect_greeting {
            expect_response(&mut reader, "220").await?;
        }

        send_command(&mut reader, &format!("EHLO {}", ehlo_name())).await?;
        expect_response(&mut reader, "250").await?;

        if let Some((username, password)) = self.config.credentials() {
            let auth = BASE64.encode(format!("\0{username}\0{password}"));
            send_command(&mut reader, &format!("AUTH PLAIN {auth}")).await?;
            let response = read_response(&mut reader).await?;
            if !response.starts_with("235") {
                error!(response = %response.trim(), "SMTP authentication rejected");
                return Err(SmtpError::AuthenticationFailed);
            }
            debug!("SMTP authentication succeeded");
        }

        send_command(
            &mut reader,
            &format!("MAIL FROM:<{}>", self.config.from_address),
        )
        .await?;
        expect_response(&mut reader, "250").await?;

        send_command(&mut reader, &format!("RCPT TO:<{to}>")).await?;
        expect_response(&mut reader, "250").await?;

        send_command(&mut reader, "DATA").await?;
        expect_response(&mut reader, "354").await?;

        reader
            .write_all(content.as_bytes())
            .await
            .map_err(|e| SmtpError::Protocol(format!("Failed to write message: {e}")))?;
        send_command(&mut reader, "\r\n.").await?;
        expect_response(&mut reader, "250").await?;

        // A failed QUIT does not undo an accepted message
        if send_command(&mut reader, "QUIT").await.is_ok() {
            let _ = read_response(&mut reader).await;
        }

        Ok(())
    }
}

fn ehlo_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

async fn send_command<W>(writer: &mut W, command: &str) -> Result<(), SmtpError>
where
    W: AsyncWrite + Unpin,
{
    if command.starts_with("AUTH") {
        trace!("SMTP command: AUTH PLAIN [redacted]");
    } else {
        trace!(command = %command, "SMTP command");
    }
    writer
        .write_all(format!("{command}\r\n").as_bytes())
        .await
        .map_err(|e| SmtpError::Protocol(format!("Failed to send command: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| SmtpError::Protocol(format!("Failed to flush: {e}")))
}

/// Read a possibly multi-line reply ("250-..." continues, "250 ..." ends)
async fn read_response<R>(reader: &mut BufReader<R>) -> Result<String, SmtpError>
where
    R: AsyncRead + Unpin,
{
    let mut response = String::new();
    loop {
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| SmtpError::Protocol(format!("Failed to read response: {e}")))?;
        if read == 0 {
            return Err(SmtpError::Protocol(
                "Connection closed by server".to_string(),
            ));
        }

        trace!(line = %line.trim(), "SMTP response");
        response.push_str(&line);

        if line.len() < 4 || line.as_bytes()[3] != b'-' {
            break;
        }
    }
    Ok(response)
}

async fn expect_response<R>(reader: &mut BufReader<R>, expected_code: &str) -> Result<(), SmtpError>
where
    R: AsyncRead + Unpin,
{
    let response = read_response(reader).await?;
    if !response.starts_with(expected_code) {
        return Err(SmtpError::Protocol(format!(
            "Expected {expected_code}, got: {}",
            response.trim()
        )));
    }
    Ok(())
}
