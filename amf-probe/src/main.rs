use amf_probe_common::models::ProbeConfig;
use amf_probe_common::{probe, report};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::{io::Write, path::PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod amf;
mod vulkan;

use amf::AmfLoader;
use vulkan::VulkanBootstrap;

/// Reports which AMF hardware encoders the active AMD adapter supports.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Load the AMF runtime from this path instead of the system library
    #[arg(long)]
    amf_library: Option<PathBuf>,

    /// Application name reported to the Vulkan driver
    #[arg(long, default_value = "amf-test")]
    app_name: String,

    /// Log to stderr: -v info, -vv debug, -vvv trace (overrides RUST_LOG)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) -> Result<()> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // stdout carries the report only.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!(e))
        .context("Failed to initialize logging")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let config = ProbeConfig {
        app_name: args.app_name,
        amf_library: args.amf_library,
        ..ProbeConfig::default()
    };
    info!("Probing AMF encoders: {:?}", config);

    // Failures are reported on stdout and still exit 0.
    let outcome = probe::run(&VulkanBootstrap, &AmfLoader, &config);
    let output = match &outcome {
        Ok(outcome) => report::render_report(&outcome.caps),
        Err(e) => {
            warn!("{}: {}", e, e.detail());
            report::render_error(e)
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Failed to write report")?;

    // The AMF runtime is unloaded only once the report is out.
    drop(outcome);
    Ok(())
}
