//! Modules list writer.
//!
//! This module handles the output destinations of a packed modules list: an
//! existing boot-loader image the list is appended to, and a standalone
//! modules file.

use anyhow::{bail, Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Where the packed modules list goes.
#[derive(Debug, Clone, Default)]
pub struct Destinations {
    /// Existing image, list appended after its contents.
    pub boot_loader: Option<PathBuf>,
    /// File whose entire contents become the list.
    pub modules_file: Option<PathBuf>,
}

impl Destinations {
    pub fn from_config(config: &Config) -> Self {
        Self {
            boot_loader: config.boot_loader.clone(),
            modules_file: config.modules_file.clone(),
        }
    }

    /// Fails unless at least one destination is set.
    pub fn check(&self) -> Result<()> {
        if self.boot_loader.is_none() && self.modules_file.is_none() {
            bail!("no output file specified (use --boot-loader and/or --modules-file)");
        }
        Ok(())
    }

    /// Writes `list` to every destination.
    ///
    /// Enforces `check` as well. Every destination is opened before any
    /// byte is written, so a destination that cannot be opened leaves the
    /// others untouched.
    pub fn write(&self, list: &[u8]) -> Result<()> {
        self.check()?;

        let image = self.boot_loader.as_deref().map(open_image).transpose()?;
        let modules_file = self
            .modules_file
            .as_deref()
            .map(create_modules_file)
            .transpose()?;

        if let Some((path, mut file)) = image {
            file.write_all(list)
                .with_context(|| format!("failed to append to {}", path.display()))?;
            tracing::info!("Appended {} bytes to {}", list.len(), path.display());
        }

        if let Some((path, mut file)) = modules_file {
            file.write_all(list)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {} bytes to {}", list.len(), path.display());
        }

        Ok(())
    }
}

/// Opens an existing boot-loader image for appending.
pub fn open_image(path: &Path) -> Result<(&Path, File)> {
    let file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open boot loader {}", path.display()))?;
    Ok((path, file))
}

/// Creates or truncates the standalone modules file.
pub fn create_modules_file(path: &Path) -> Result<(&Path, File)> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    Ok((path, file))
}
