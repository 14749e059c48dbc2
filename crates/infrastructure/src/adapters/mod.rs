//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod maps_adapter;
mod smtp_notification_adapter;
mod static_recipient_directory;

pub use maps_adapter::MapsAdapter;
pub use smtp_notification_adapter::SmtpNotificationAdapter;
pub use static_recipient_directory::StaticRecipientDirectory;
