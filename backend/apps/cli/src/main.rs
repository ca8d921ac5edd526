//! Oblique CLI Entry Point
//!
//! Terminal client for the strategy API. Logs go to stderr so that
//! command output stays pipeable.

mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::Session;
use crate::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oblique=warn,strategy=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let session = Session::open(&cli).await?;
    let output = session.run(&cli.command).await?;
    println!("{output}");

    Ok(())
}
