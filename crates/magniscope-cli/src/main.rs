mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "magniscope", about = "EVM parameter-sweep and grid-visualization harness")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show SER video file metadata
    Info(commands::info::InfoArgs),
    /// Composite a magnified crop back onto the original footage
    Overlay(commands::overlay::OverlayArgs),
    /// Run the magnification sweep and list the produced videos
    Sweep(commands::sweep::SweepArgs),
    /// Run the full harness: sweep, cache, grid GIF, cleanup
    Render(commands::render::RenderArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Overlay(args) => commands::overlay::run(args),
        Commands::Sweep(args) => commands::sweep::run(args),
        Commands::Render(args) => commands::render::run(args),
    }
}
