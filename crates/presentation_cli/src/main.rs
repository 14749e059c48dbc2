//! Tollgate CLI
//!
//! Command-line interface for administration and testing.

#![allow(clippy::print_stdout)]

use std::{fs::File, path::Path};

use anyhow::Context;
use application::ports::TripStorePort;
use clap::Parser;
use infrastructure::{AppComponents, AppConfig, init_tracing, load_zones, verbosity_filter};
use presentation_cli::{
    Cli, Commands, ZonesCommand, backup, cli::endpoint_url, commands, replay_samples,
};
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref());

    // Quiet by default so command output stays readable.
    let filter = verbosity_filter(cli.verbose).unwrap_or("warn");
    init_tracing(&config.telemetry, Some(filter))
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    debug!(?cli, "Parsed arguments");

    match cli.command {
        Commands::Zones { command } => {
            let (zones, summary) = load_zones(
                Path::new(&config.zones.data_file),
                &config.zones.identifier_column,
            )
            .with_context(|| format!("Cannot load zone data from {}", config.zones.data_file))?;

            match command {
                ZonesCommand::Check { label } => {
                    println!("{}", commands::describe_zone_check(&zones, &label));
                },
                ZonesCommand::Stats => {
                    println!("Zone data: {}", config.zones.data_file);
                    print!("{}", commands::describe_zone_stats(&summary, &zones));
                },
            }
        },

        Commands::Fare { km } => {
            let schedule = config.fare.to_fare_schedule()?;
            println!(
                "{}",
                commands::describe_fare(&schedule, km, &config.fare.currency)
            );
        },

        Commands::Replay { file } => {
            let components = AppComponents::build(&config)?;
            let reader =
                File::open(&file).with_context(|| format!("Cannot open {}", file.display()))?;
            let summary = replay_samples(&components.engine, reader).await?;
            println!("{}", commands::describe_replay(&summary));
        },

        Commands::Trips { subject, limit } => {
            let components = AppComponents::build(&config)?;
            let subject = domain::SubjectId::new(subject)?;
            let trips = components
                .trip_store
                .list_by_subject(&subject, limit)
                .await?;
            println!("{}", commands::describe_trips(&trips));
        },

        Commands::Send {
            subject,
            latitude,
            longitude,
            url,
        } => {
            let resp = reqwest::Client::new()
                .post(endpoint_url(&url, "/v1/locations"))
                .json(&serde_json::json!({
                    "subject_id": subject,
                    "latitude": latitude,
                    "longitude": longitude,
                }))
                .send()
                .await?;
            let status = resp.status();
            let body = resp.json::<serde_json::Value>().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            if !status.is_success() {
                anyhow::bail!("Server rejected the sample: HTTP {status}");
            }
        },

        Commands::Health { url } => {
            match reqwest::Client::new()
                .get(endpoint_url(&url, "/ready"))
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    println!("Ready");
                },
                Ok(resp) => {
                    println!("Not ready: HTTP {}", resp.status());
                    std::process::exit(1);
                },
                Err(e) => {
                    println!("Unreachable: {e}");
                    std::process::exit(1);
                },
            }
        },

        Commands::Backup { output } => {
            let result = backup::backup_database(Path::new(&config.database.path), output).await?;
            #[allow(clippy::cast_precision_loss)]
            let size_mb = result.size_bytes as f64 / 1_048_576.0;
            println!("Backup written to {}", result.local_path.display());
            println!("Size: {size_mb:.2} MB, took {}ms", result.duration_ms);
        },
    }

    Ok(())
}
