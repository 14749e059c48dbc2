//! SMTP submission for Tollgate
//!
//! A lightweight async SMTP client built on tokio and tokio-native-tls.
//! Supports STARTTLS, implicit TLS and plaintext relays, with `AUTH PLAIN`.

mod client;
mod config;
mod error;
mod message;
mod tls;

pub use client::SmtpMailer;
pub use config::{SmtpConfig, SmtpSecurity, TlsConfig};
pub use error::SmtpError;
pub use message::OutgoingEmail;
