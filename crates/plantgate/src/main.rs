//! PlantGate CLI - PlantUML rendering gateway.
//!
//! Provides commands for:
//! - `render`: Render diagram source to an SVG or PNG image
//! - `check`: Validate diagram source without keeping the image

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, RenderArgs};
use output::Output;

/// PlantGate - PlantUML rendering gateway.
#[derive(Parser)]
#[command(name = "plantgate", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render diagram source to an image.
    Render(RenderArgs),
    /// Validate diagram source against the engine.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Render(args) => args.verbose,
        Commands::Check(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Check(args) => args.execute(&output),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            output.error(&format!("Error: {err}"));
            std::process::exit(1);
        }
    }
}
