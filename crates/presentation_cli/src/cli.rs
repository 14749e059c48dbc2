//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default server URL for the remote commands
pub const DEFAULT_URL: &str = "http://localhost:3000";

/// Tollgate CLI
#[derive(Debug, Parser)]
#[command(name = "tollgate")]
#[command(author, version, about = "Toll-zone trip tracking", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "TOLLGATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect the zone reference data
    Zones {
        #[command(subcommand)]
        command: ZonesCommand,
    },

    /// Compute the fare for a distance with the configured rate
    Fare {
        /// Distance in kilometres
        km: f64,
    },

    /// Feed a CSV of samples through the engine in file order
    ///
    /// Columns: subject_id, latitude, longitude, observed_at (RFC 3339,
    /// optional per row).
    Replay {
        /// Samples file
        file: PathBuf,
    },

    /// Show the most recent trips of a subject
    Trips {
        /// Subject identifier
        subject: String,

        /// Maximum number of trips to show
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Post one sample to a running server
    Send {
        /// Subject identifier
        subject: String,

        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// Server URL
        #[arg(short, long, default_value = DEFAULT_URL)]
        url: String,
    },

    /// Check server readiness (exit code 1 when not ready)
    Health {
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_URL)]
        url: String,
    },

    /// Create an online backup of the trip database
    Backup {
        /// Output path (auto-generated if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ZonesCommand {
    /// Report whether a label counts as inside a toll zone
    Check {
        /// Label as a geocoder would return it
        label: String,
    },

    /// Summarize the loaded zone data
    Stats,
}

/// Format endpoint URL
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_without_double_slash() {
        assert_eq!(
            endpoint_url("http://localhost:3000", "/ready"),
            "http://localhost:3000/ready"
        );
        assert_eq!(
            endpoint_url("http://example.com/", "/v1/locations"),
            "http://example.com/v1/locations"
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
