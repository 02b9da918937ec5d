//! Binary crate for the `weather-server` service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Installing the log subscriber
//! - Handing off to the HTTP service or a one-shot lookup

use clap::Parser;
use weather_server::{cli, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.log_json);

    if let Err(e) = cmd.run().await {
        tracing::error!(error = %format!("{e:#}"), "fatal");
        return Err(e);
    }

    Ok(())
}
