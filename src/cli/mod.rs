//! Command-line interface wiring for rx-benchmark.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod benchmark;
pub mod combine;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Comparative prescribing analytics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Combine(args) => combine::run(args, settings).await,
            Commands::Benchmark(args) => benchmark::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Join a numerator and a denominator series and compute ratios.
    Combine(combine::Args),
    /// Rank organizations on a measure against national centiles.
    Benchmark(benchmark::Args),
    /// Serve the JSON API.
    Serve(serve::Args),
}
