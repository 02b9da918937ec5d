use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_core::{
    ServerConfig,
    config::{api_key_from, env_lookup, upstream_from},
    provider_from_config,
};

use crate::app::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Current weather lookup service")]
pub struct Cli {
    /// Emit logs as JSON lines instead of compact text.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service (default).
    ///
    /// Listens on HTTP_LISTEN_ADDR:HTTP_LISTEN_PORT.
    Serve,

    /// Look up the weather once and print the report.
    Show {
        /// Latitude in degrees, -90 to 90.
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude in degrees, -180 to 180.
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => {
                let config = ServerConfig::from_env().context("Invalid server configuration")?;
                app::serve(config).await
            }
            Command::Show { lat, lon } => {
                let upstream = upstream_from(env_lookup).context("Invalid upstream configuration")?;
                let provider = provider_from_config(&upstream)
                    .context("Failed to build OpenWeather client")?;
                let state = AppState::new(api_key_from(env_lookup), Arc::new(provider));

                let report = state.lookup(&lat, &lon).await?;
                println!("{report}");
                Ok(())
            }
        }
    }
}
