//! # mrp CLI entry point
//!
//! Parses command-line arguments, initialises tracing and dispatches to
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mrp_cli::inspect::{run_inspect, InspectArgs};
use mrp_cli::serve::{run_serve, ServeArgs};

/// Maven resolver proxy.
///
/// Serves artifacts from local directories in Maven repository layout over
/// HTTP, with on-the-fly checksums and synthesized maven-metadata.xml.
#[derive(Parser, Debug)]
#[command(name = "mrp", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve repository directories over HTTP until interrupted.
    Serve(ServeArgs),

    /// Show how a repository path is classified.
    Inspect(InspectArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    let result = match &cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Inspect(args) => run_inspect(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
