//! securefile-probe - security checks against a running SecureFile server
//!
//! Uploads a fixed set of benign and hostile files through both entry points
//! and reports which protections held. Exits non-zero if any case fails.

mod output;
mod suites;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use securefile_client::UploadClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::output::{OutputContext, Summary};
use crate::suites::{Probe, Suite};

#[derive(Parser)]
#[command(name = "securefile-probe")]
#[command(author, version, about = "SecureFile security probe")]
struct Cli {
    /// Server URL
    #[arg(
        short,
        long,
        env = "SECUREFILE_SERVER",
        default_value = "http://localhost:5000"
    )]
    server: String,

    /// Server upload directory as seen from this host (read by the integrity suite)
    #[arg(long, default_value = "static/files")]
    upload_dir: PathBuf,

    /// Run a single suite
    #[arg(long, value_enum)]
    only: Option<Suite>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let ctx = OutputContext::new(cli.json, cli.no_color);
    let client = UploadClient::new(&cli.server).context("Failed to create SecureFile client")?;

    if let Err(e) = client.health().await {
        ctx.error(&format!("SecureFile server is not reachable at {}: {}", cli.server, e));
        ctx.error("Start it first (e.g. `securefiled`) or point --server at it.");
        return Ok(ExitCode::from(2));
    }
    ctx.info(&format!("Server at {} is up, running probes...", cli.server));

    let probe = Probe::new(client, cli.upload_dir);
    let results = probe.run_all(cli.only).await;
    ctx.print_results(&results);

    if Summary::from_results(&results).failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
