//! Entry point for the bl-modules tool.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap`.
//! 2. Check that at least one output destination was given.
//! 3. Load every module file, in the order listed.
//! 4. Pack the modules list and write it to each destination.
//!
//! Error handling is done via `anyhow`.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bl_modules::config::Config;
use bl_modules::packer::pack;
use bl_modules::source::load_all;
use bl_modules::writer::Destinations;

fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Nothing may be read or written without a destination.
    let destinations = Destinations::from_config(&config);
    destinations.check()?;

    let sources = load_all(&config.list)?;
    let list = pack(&sources)?;
    tracing::debug!("Packed {} modules into {} bytes", sources.len(), list.len());

    destinations.write(&list)?;
    Ok(())
}
