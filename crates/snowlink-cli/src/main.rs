#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, Config};
use std::io::{BufWriter, Write};
use telemetry::init_telemetry;

// Minting across threads allocates per-thread batches; mimalloc keeps that
// cheap under contention, especially in musl environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry(config.log_format).context("failed to initialize logging")?;

    if cfg!(debug_assertions) {
        tracing::debug!("running with config: {:#?}", config);
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    commands::run(&config, &mut out)?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}
