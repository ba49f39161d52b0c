//! Configuration module.
//!
//! This module defines the command-line interface (CLI) using `clap`: the
//! ordered list of module files and the destinations of the packed list.

use clap::Parser;
use std::path::PathBuf;

/// Packs boot-loader modules into a single modules list.
///
/// The list is appended to an existing boot-loader image, written to a
/// standalone modules file, or both.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Boot loader image to append the modules list to
    #[arg(short, long)]
    pub boot_loader: Option<PathBuf>,

    /// File to write the modules list to (truncated)
    #[arg(short, long)]
    pub modules_file: Option<PathBuf>,

    /// Module files, packed in the order given
    #[arg(short, long, required = true, num_args = 1..)]
    pub list: Vec<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: String,
}
