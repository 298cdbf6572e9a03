//! Neon CLI - Headless driver for the Neon particle engine

mod commands;
mod raster;
mod script;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{probe, render, simulate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "neon")]
#[command(about = "Interactive decorative particle engine, driven headless", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine for a number of frames and print population stats
    Simulate(simulate::RunOptions),

    /// Run the engine and rasterize the final frame to a PNG image
    Render(render::RenderArgs),

    /// Run the performance-tier capability probe
    Probe {
        /// Number of probe runs
        #[arg(long, default_value = "5")]
        runs: u32,

        /// Probe window in milliseconds
        #[arg(long, default_value = "10")]
        window_ms: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(options) => simulate::run(options),
        Commands::Render(args) => render::run(args),
        Commands::Probe { runs, window_ms } => probe::run(runs, window_ms),
    }
}
