//! SMTP notification adapter - Implements NotificationPort using
//! integration_smtp

use application::{
    ports::{NotificationError, NotificationPort, TollBill},
    services::bill_formatter::format_bill_body,
};
use async_trait::async_trait;
use integration_smtp::{OutgoingEmail, SmtpError, SmtpMailer};
use tracing::{info, instrument, warn};

use crate::config::SmtpAppConfig;

/// Delivers toll bills by email
#[derive(Debug)]
pub struct SmtpNotificationAdapter {
    mailer: Option<SmtpMailer>,
}

impl SmtpNotificationAdapter {
    /// Build from the optional SMTP section
    ///
    /// Missing section or credentials produce an adapter that reports
    /// `NotConfigured` on every send.
    pub fn new(config: Option<&SmtpAppConfig>) -> Self {
        let Some(config) = config else {
            return Self::unconfigured();
        };
        if !config.has_credentials() && config.security != Some(integration_smtp::SmtpSecurity::Plain) {
            warn!(host = %config.host, "SMTP credentials missing; bill delivery disabled");
            return Self::unconfigured();
        }

        match SmtpMailer::new(config.to_smtp_config()) {
            Ok(mailer) => Self::with_mailer(mailer),
            Err(e) => {
                warn!(error = %e, "Invalid SMTP configuration; bill delivery disabled");
                Self::unconfigured()
            },
        }
    }

    /// Wrap a ready mailer
    #[must_use]
    pub const fn with_mailer(mailer: SmtpMailer) -> Self {
        Self {
            mailer: Some(mailer),
        }
    }

    /// Adapter that never sends
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self { mailer: None }
    }

    /// Whether a mailer is present
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.mailer.is_some()
    }

    fn map_error(err: SmtpError) -> NotificationError {
        match err {
            SmtpError::NotConfigured(_) => NotificationError::NotConfigured,
            SmtpError::InvalidAddress(_) => NotificationError::NoRecipient,
            other => NotificationError::DeliveryFailed(other.to_string()),
        }
    }
}

#[async_trait]
impl NotificationPort for SmtpNotificationAdapter {
    #[instrument(skip(self, bill), fields(recipient = %bill.recipient))]
    async fn send_bill(&self, bill: &TollBill) -> Result<(), NotificationError> {
        if bill.recipient.trim().is_empty() {
            return Err(NotificationError::NoRecipient);
        }
        let mailer = self.mailer.as_ref().ok_or(NotificationError::NotConfigured)?;

        let email = OutgoingEmail::new(
            bill.recipient.trim(),
            bill.subject_line.clone(),
            format_bill_body(bill),
        );
        let message_id = mailer.send(&email).await.map_err(Self::map_error)?;

        info!(message_id = %message_id, "Bill email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use application::ports::BillStop;
    use chrono::Utc;
    use integration_smtp::{SmtpConfig, SmtpSecurity};
    use tokio::{
        io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
        net::TcpListener,
    };

    use super::*;

    fn bill(recipient: &str) -> TollBill {
        TollBill {
            recipient: recipient.to_string(),
            subject_line: "Toll Bill: Trip Completed".to_string(),
            entry: BillStop {
                label: Some("Plaza A".to_string()),
                at: Some(Utc::now()),
            },
            exit: BillStop {
                label: Some("Highway 9".to_string()),
                at: Some(Utc::now()),
            },
            distance_km: Some(12.34),
            amount_due: Some(37.02),
            rate_per_km: 3.0,
            currency: "INR".to_string(),
        }
    }

    fn app_config() -> SmtpAppConfig {
        SmtpAppConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: None,
            password: None,
            from_address: "toll@example.com".to_string(),
            from_name: None,
            verify_certificates: true,
            security: None,
        }
    }

    /// Accepts one message and returns everything sent after DATA
    async fn accept_one_message() -> (u16, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read, mut write) = stream.into_split();
            let mut reader = BufReader::new(read);
            let mut data = String::new();
            let mut in_data = false;
            write.write_all(b"220 ready\r\n").await.unwrap();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await.unwrap() == 0 {
                    break;
                }
                if in_data {
                    if line == ".\r\n" {
                        in_data = false;
                        write.write_all(b"250 queued\r\n").await.unwrap();
                    } else {
                        data.push_str(&line);
                    }
                    continue;
                }
                let reply: &[u8] = match line.trim_end() {
                    "DATA" => {
                        in_data = true;
                        b"354 go\r\n"
                    },
                    "QUIT" => {
                        write.write_all(b"221 bye\r\n").await.unwrap();
                        break;
                    },
                    _ => b"250 ok\r\n",
                };
                write.write_all(reply).await.unwrap();
            }
            data
        });
        (port, handle)
    }

    #[test]
    fn absent_section_is_unconfigured() {
        assert!(!SmtpNotificationAdapter::new(None).is_configured());
    }

    #[test]
    fn missing_password_is_unconfigured() {
        assert!(!SmtpNotificationAdapter::new(Some(&app_config())).is_configured());
    }

    #[tokio::test]
    async fn unconfigured_send_reports_not_configured() {
        let adapter = SmtpNotificationAdapter::unconfigured();
        assert_eq!(
            adapter.send_bill(&bill("driver@example.com")).await,
            Err(NotificationError::NotConfigured)
        );
    }

    #[tokio::test]
    async fn blank_recipient_is_rejected() {
        let adapter = SmtpNotificationAdapter::unconfigured();
        assert_eq!(
            adapter.send_bill(&bill("  ")).await,
            Err(NotificationError::NoRecipient)
        );
    }

    #[tokio::test]
    async fn delivers_formatted_bill() {
        let (port, server) = accept_one_message().await;
        let mut config = SmtpConfig::new("127.0.0.1", "toll@example.com", "");
        config.port = port;
        config.security = Some(SmtpSecurity::Plain);
        config.username = None;
        let adapter = SmtpNotificationAdapter::with_mailer(SmtpMailer::new(config).unwrap());

        adapter.send_bill(&bill("driver@example.com")).await.unwrap();

        let data = server.await.unwrap();
        assert!(data.contains("Subject: Toll Bill: Trip Completed\r\n"));
        assert!(data.contains("Entry Point: Plaza A\r\n"));
        assert!(data.contains("Distance Travelled: 12.34 km\r\n"));
        assert!(data.contains("INR 37.02"));
    }

    #[tokio::test]
    async fn connection_failure_is_delivery_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut config = SmtpConfig::new("127.0.0.1", "toll@example.com", "");
        config.port = port;
        config.security = Some(SmtpSecurity::Plain);
        let adapter = SmtpNotificationAdapter::with_mailer(SmtpMailer::new(config).unwrap());

        assert!(matches!(
            adapter.send_bill(&bill("driver@example.com")).await,
            Err(NotificationError::DeliveryFailed(_))
        ));
    }
}
