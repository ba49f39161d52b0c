//! Modules list packing.
//!
//! The `Packer` collects module payloads in order and serializes them into
//! a single modules list:
//! 1. A `ModulesListHeader` carrying the module count and total payload size.
//! 2. For each module, a `ModuleHeader` with its size, then the payload bytes.
//!
//! Sizes are checked against the 32-bit header fields as modules are added,
//! so `finish` itself cannot fail.

use anyhow::{anyhow, Context, Result};
use object::pod::bytes_of;

use crate::format::{ModuleHeader, ModulesListHeader, LIST_HEADER_SIZE, MODULE_HEADER_SIZE};
use crate::utils::to_u32_field;

/// Incremental builder for a modules list.
///
/// Payloads are borrowed until `finish` copies them into the output buffer.
#[derive(Debug, Default)]
pub struct Packer<'a> {
    modules: Vec<&'a [u8]>,
    total_size: u32,
}

impl<'a> Packer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a module after the ones already added.
    pub fn add_module(&mut self, payload: &'a [u8]) -> Result<()> {
        let index = self.modules.len();
        to_u32_field(index + 1, "module count")?;
        let size = to_u32_field(payload.len(), "payload size")
            .with_context(|| format!("module {} is too large", index))?;
        self.total_size = self.total_size.checked_add(size).ok_or_else(|| {
            anyhow!(
                "total payload size exceeds {} bytes at module {}",
                u32::MAX,
                index
            )
        })?;

        tracing::debug!("Adding module {} ({} bytes)", index, size);
        self.modules.push(payload);
        Ok(())
    }

    pub fn module_count(&self) -> u32 {
        // Bounded by the check in `add_module`.
        self.modules.len() as u32
    }

    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Length in bytes of the list `finish` will produce.
    pub fn packed_len(&self) -> usize {
        LIST_HEADER_SIZE + self.modules.len() * MODULE_HEADER_SIZE + self.total_size as usize
    }

    /// Serializes the list header and every module, in insertion order.
    pub fn finish(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.packed_len());

        let list_header = ModulesListHeader::new(self.module_count(), self.total_size);
        buffer.extend_from_slice(bytes_of(&list_header));

        for payload in &self.modules {
            let header = ModuleHeader::new(payload.len() as u32);
            buffer.extend_from_slice(bytes_of(&header));
            buffer.extend_from_slice(payload);
        }

        debug_assert_eq!(buffer.len(), self.packed_len());
        buffer
    }
}

/// Packs `modules` into a modules list, preserving their order.
pub fn pack<M: AsRef<[u8]>>(modules: &[M]) -> Result<Vec<u8>> {
    let mut packer = Packer::new();
    for module in modules {
        packer.add_module(module.as_ref())?;
    }
    Ok(packer.finish())
}
