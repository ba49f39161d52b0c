//! Module payload files.
//!
//! Every file named on the command line becomes one module. Files are mapped
//! read-only; their contents are not interpreted.

use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// The payload of one module, loaded from disk.
pub struct ModuleSource {
    path: PathBuf,
    // Zero-length files are not mapped.
    mmap: Option<Mmap>,
}

impl ModuleSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len();

        let mmap = if len == 0 {
            None
        } else {
            let mmap = unsafe { Mmap::map(&file) }
                .with_context(|| format!("failed to map {}", path.display()))?;
            Some(mmap)
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Deref for ModuleSource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }
}

impl AsRef<[u8]> for ModuleSource {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

/// Opens every module file, in order.
pub fn load_all(paths: &[PathBuf]) -> Result<Vec<ModuleSource>> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let source = ModuleSource::open(path)?;
        tracing::debug!("Loaded {} ({} bytes)", path.display(), source.len());
        sources.push(source);
    }
    Ok(sources)
}
