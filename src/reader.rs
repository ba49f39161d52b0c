//! Modules list reader.
//!
//! Walks a packed modules list the same way the boot loader does: check the
//! list magic, then read `count` module headers, checking each module magic
//! and skipping `size` payload bytes. Used to verify packed output.

use anyhow::{anyhow, bail, Context, Result};
use object::pod::from_bytes;

use crate::format::{ModuleHeader, ModulesListHeader, BL_MODULES_LIST_MAGIC, MODULE_HEADER_SIZE};

/// One module record borrowed from a modules list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Module<'a> {
    /// Position of the module in the list.
    pub index: usize,
    pub payload: &'a [u8],
}

/// A validated modules list.
#[derive(Debug)]
pub struct ModuleList<'a> {
    header: ModulesListHeader,
    modules: Vec<Module<'a>>,
    len: usize,
}

impl<'a> ModuleList<'a> {
    /// Parses a modules list starting at the first byte of `data`.
    ///
    /// Bytes after the last module are ignored.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let (header, mut rest) = match from_bytes::<ModulesListHeader>(data) {
            Ok((header, rest)) if header.is_valid() => (*header, rest),
            _ => bail!("invalid module list: missing list header"),
        };

        let count = header.count() as usize;
        let mut modules = Vec::with_capacity(count.min(rest.len() / MODULE_HEADER_SIZE));
        let mut walked: u64 = 0;

        for index in 0..count {
            let (module_header, tail) = from_bytes::<ModuleHeader>(rest)
                .ok()
                .with_context(|| format!("module list truncated in header of module {}", index))?;
            if !module_header.is_valid() {
                bail!("invalid module {}: bad magic", index);
            }

            let size = module_header.size() as usize;
            if tail.len() < size {
                bail!(
                    "module list truncated in payload of module {} ({} of {} bytes)",
                    index,
                    tail.len(),
                    size
                );
            }
            let (payload, tail) = tail.split_at(size);
            tracing::trace!("Found module {} ({} bytes)", index, size);

            modules.push(Module { index, payload });
            walked += size as u64;
            rest = tail;
        }

        if walked != u64::from(header.total_size()) {
            bail!(
                "module list total size is {} but modules hold {} bytes",
                header.total_size(),
                walked
            );
        }

        Ok(Self {
            header,
            modules,
            len: data.len() - rest.len(),
        })
    }

    /// Locates a modules list anywhere in `data` and parses it.
    ///
    /// Returns the offset of the first position that holds a valid list,
    /// along with the list. This is how a boot-loader image with an appended
    /// list is inspected; stray copies of the list magic are skipped.
    pub fn find(data: &'a [u8]) -> Result<(usize, Self)> {
        let magic = BL_MODULES_LIST_MAGIC.to_le_bytes();
        let mut last_err = None;

        for offset in data
            .windows(magic.len())
            .enumerate()
            .filter(|(_, w)| *w == &magic[..])
            .map(|(offset, _)| offset)
        {
            match Self::parse(&data[offset..]) {
                Ok(list) => return Ok((offset, list)),
                Err(err) => {
                    tracing::debug!("No module list at offset {}: {}", offset, err);
                    last_err = Some(err.context(format!("at offset {}", offset)));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("invalid module list: list magic not found")))
    }

    pub fn module_count(&self) -> u32 {
        self.header.count()
    }

    pub fn total_size(&self) -> u32 {
        self.header.total_size()
    }

    pub fn modules(&self) -> &[Module<'a>] {
        &self.modules
    }

    /// Number of bytes the list occupies, headers included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::pack;

    #[test]
    fn test_round_trip() {
        let inputs: Vec<Vec<u8>> = vec![b"first".to_vec(), vec![], vec![0xFF; 300], b"last".to_vec()];
        let blob = pack(&inputs).unwrap();
        let list = ModuleList::parse(&blob).unwrap();

        assert_eq!(list.module_count(), 4);
        assert_eq!(list.total_size(), 309);
        assert_eq!(list.len(), blob.len());
        let payloads: Vec<Vec<u8>> = list.modules().iter().map(|m| m.payload.to_vec()).collect();
        assert_eq!(payloads, inputs);
        assert_eq!(list.modules()[2].index, 2);
    }

    #[test]
    fn test_empty_list() {
        let blob = pack::<&[u8]>(&[]).unwrap();
        let list = ModuleList::parse(&blob).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.len(), 16);
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut blob = pack(&[b"abc"]).unwrap();
        let packed_len = blob.len();
        blob.extend_from_slice(b"trailer");
        let list = ModuleList::parse(&blob).unwrap();
        assert_eq!(list.len(), packed_len);
    }

    #[test]
    fn test_bad_list_magic() {
        let mut blob = pack(&[b"abc"]).unwrap();
        blob[0] ^= 0xFF;
        let err = ModuleList::parse(&blob).unwrap_err();
        assert!(err.to_string().contains("invalid module list"));
    }

    #[test]
    fn test_short_data() {
        let err = ModuleList::parse(b"BLMODLST").unwrap_err();
        assert!(err.to_string().contains("invalid module list"));
    }

    #[test]
    fn test_bad_module_magic() {
        let mut blob = pack(&[b"a", b"b"]).unwrap();
        // Second module header starts at 16 + 12 + 1.
        blob[29] = b'X';
        let err = ModuleList::parse(&blob).unwrap_err();
        assert_eq!(err.to_string(), "invalid module 1: bad magic");
    }

    #[test]
    fn test_truncated_payload() {
        let blob = pack(&[b"abcdef"]).unwrap();
        let err = ModuleList::parse(&blob[..blob.len() - 2]).unwrap_err();
        assert!(err.to_string().contains("truncated in payload of module 0"));
    }

    #[test]
    fn test_truncated_header() {
        let blob = pack(&[b"", b""]).unwrap();
        let err = ModuleList::parse(&blob[..blob.len() - 4]).unwrap_err();
        assert!(err.to_string().contains("truncated in header of module 1"));
    }

    #[test]
    fn test_total_size_mismatch() {
        let mut blob = pack(&[b"abc"]).unwrap();
        blob[12] = 4;
        let err = ModuleList::parse(&blob).unwrap_err();
        assert!(err.to_string().contains("total size"));
    }

    #[test]
    fn test_find_after_image() {
        let mut image = vec![0x90u8; 513];
        let blob = pack(&[b"mod"]).unwrap();
        image.extend_from_slice(&blob);

        let (offset, list) = ModuleList::find(&image).unwrap();
        assert_eq!(offset, 513);
        assert_eq!(list.modules()[0].payload, b"mod");
    }

    #[test]
    fn test_find_skips_stray_magic() {
        let mut image = vec![0u8; 32];
        image.extend_from_slice(b"BLMODLST");
        image.extend_from_slice(&[0xFF; 40]);
        let blob = pack(&[b"mod"]).unwrap();
        image.extend_from_slice(&blob);

        let (offset, list) = ModuleList::find(&image).unwrap();
        assert_eq!(offset, 80);
        assert_eq!(list.modules()[0].payload, b"mod");
    }

    #[test]
    fn test_find_reports_bad_list() {
        let mut image = b"BLMODLST".to_vec();
        image.extend_from_slice(&[0xFF; 8]);
        assert!(ModuleList::find(&image).is_err());
    }

    #[test]
    fn test_find_missing() {
        assert!(ModuleList::find(&[0u8; 64]).is_err());
    }
}
