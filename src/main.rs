//! vidtrend - trending video history
//!
//! # Usage
//!
//! ```bash
//! # Dashboard on the configured address (default 127.0.0.1:8501)
//! vidtrend serve
//!
//! # Fetch and record one chart
//! vidtrend refresh US gaming --api-key "$KEY"
//!
//! # Read back what was recorded
//! vidtrend history IN music --video dQw4w9WgXcQ
//! ```

mod cmd;
mod error;

use crate::error::{ErrorKind, Result};
use clap::{Parser, Subcommand};
use exn::ResultExt;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vidtrend_config::Config;

/// Record trending video charts and watch them grow.
#[derive(Parser, Debug)]
#[command(name = "vidtrend")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `vidtrend_history=trace`. Overrides RUST_LOG.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web dashboard
    Serve(cmd::serve::ServeArgs),
    /// Fetch the current chart for a region and category and record it
    Refresh(cmd::refresh::RefreshArgs),
    /// Print recorded snapshots
    History(cmd::history::HistoryArgs),
    /// Check that an API key is accepted
    Verify(cmd::verify::VerifyArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Command::Serve(args) => cmd::serve::run(args, &config).await,
        Command::Refresh(args) => cmd::refresh::run(args, &config).await,
        Command::History(args) => cmd::history::run(args, &config).await,
        Command::Verify(args) => cmd::verify::run(args, &config).await,
    }
}

/// `--log-level` if valid, else `RUST_LOG`, else `info`. Logs go to stderr so
/// command output on stdout stays clean.
fn init_logging(level: Option<&str>) {
    let filter = level
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
