//! Tracing subscriber initialisation
//!
//! Each binary calls [`init_tracing`] once at startup. `RUST_LOG` wins over
//! the configured filter when set.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TelemetryAppConfig;

/// Build the filter: `RUST_LOG`, then the override, then the configured default
fn build_filter(config: &TelemetryAppConfig, override_filter: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = override_filter.unwrap_or(&config.log_filter);
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Install the global subscriber
///
/// Returns an error if a subscriber is already installed.
pub fn init_tracing(
    config: &TelemetryAppConfig,
    override_filter: Option<&str>,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = build_filter(config, override_filter);
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}

/// Map a `-v` count to a filter directive
#[must_use]
pub const fn verbosity_filter(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(verbosity_filter(0), None);
        assert_eq!(verbosity_filter(1), Some("debug"));
        assert_eq!(verbosity_filter(5), Some("trace"));
    }

    #[test]
    fn invalid_directive_falls_back() {
        let config = TelemetryAppConfig {
            log_filter: "[[[not a filter".to_string(),
            json: false,
        };
        // Must not panic
        let _ = build_filter(&config, None);
    }

    #[test]
    fn second_init_fails() {
        let config = TelemetryAppConfig::default();
        let _ = init_tracing(&config, None);
        assert!(init_tracing(&config, None).is_err());
    }
}
