//! # Odyssey Sim
//!
//! Headless driver for the Odyssey vehicle mechanic. Runs a scripted ride
//! against an in-memory scene, logs every vehicle event and prints the final
//! report as JSON.
//!
//! Usage: `odyssey-sim [--json-logs] [--init] [config.toml]`
//!
//! `--init` writes the default configuration to the config path and exits.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::Simulation;
use crate::config::{SimConfig, CONFIG_FILE};

/// Command line options.
#[derive(Debug, Default)]
struct Args {
    json_logs: bool,
    init: bool,
    config: Option<PathBuf>,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut parsed = Self::default();
        for arg in args {
            if arg == "--json-logs" {
                parsed.json_logs = true;
            } else if arg == "--init" {
                parsed.init = true;
            } else if parsed.config.is_none() {
                parsed.config = Some(PathBuf::from(arg));
            }
        }
        parsed
    }
}

/// Main entry point.
fn main() -> Result<()> {
    let args = Args::parse(std::env::args().skip(1));

    let filter = EnvFilter::from_default_env().add_directive("odyssey=info".parse()?);
    if args.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    info!("Odyssey sim starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let path = args.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    if args.init {
        SimConfig::default().save_to(&path)?;
        return Ok(());
    }
    let config = SimConfig::load_from(&path);

    let report = Simulation::new(config)?.run()?;
    for entry in &report.events {
        println!("{}", entry.describe());
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("Odyssey sim shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        Args::parse(list.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn test_args() {
        let none = args(&[]);
        assert!(!none.json_logs);
        assert_eq!(none.config, None);

        let both = args(&["--json-logs", "ride.toml", "--init"]);
        assert!(both.json_logs);
        assert!(both.init);
        assert_eq!(both.config, Some(PathBuf::from("ride.toml")));

        let first_wins = args(&["a.toml", "b.toml"]);
        assert_eq!(first_wins.config, Some(PathBuf::from("a.toml")));
    }
}
