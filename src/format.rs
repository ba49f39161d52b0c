//! On-disk format of a boot-loader modules list.
//!
//! A modules list is a 16-byte list header followed by one record per module.
//! Each record is a 12-byte module header and the raw payload bytes. All
//! integers are little-endian and the headers are packed (no padding), which
//! is exactly how the boot loader reads them.

use object::endian::{LittleEndian, U32Bytes, U64Bytes};
use object::pod::Pod;

/// Magic of the list header, "BLMODLST" read as a little-endian u64.
pub const BL_MODULES_LIST_MAGIC: u64 = 0x5453_4c44_4f4d_4c42;

/// Magic of each module header, "BLMOD" zero-padded to 8 bytes.
pub const BL_MODULE_MAGIC: u64 = 0x0000_0044_4f4d_4c42;

/// Size in bytes of [`ModulesListHeader`].
pub const LIST_HEADER_SIZE: usize = 16;

/// Size in bytes of [`ModuleHeader`].
pub const MODULE_HEADER_SIZE: usize = 12;

/// Header at the start of a modules list.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ModulesListHeader {
    /// Always [`BL_MODULES_LIST_MAGIC`].
    pub magic: U64Bytes<LittleEndian>,
    /// Number of modules that follow.
    pub count: U32Bytes<LittleEndian>,
    /// Sum of the payload lengths, headers not included.
    pub total_size: U32Bytes<LittleEndian>,
}

/// Header preceding every module payload.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ModuleHeader {
    /// Always [`BL_MODULE_MAGIC`].
    pub magic: U64Bytes<LittleEndian>,
    /// Length of the payload that immediately follows.
    pub size: U32Bytes<LittleEndian>,
}

// SAFETY: both headers are built only from byte arrays, so they have
// alignment 1, no padding and every bit pattern is valid.
unsafe impl Pod for ModulesListHeader {}
unsafe impl Pod for ModuleHeader {}

const _: () = assert!(std::mem::size_of::<ModulesListHeader>() == LIST_HEADER_SIZE);
const _: () = assert!(std::mem::size_of::<ModuleHeader>() == MODULE_HEADER_SIZE);

fn u32(v: u32) -> U32Bytes<LittleEndian> {
    U32Bytes::new(LittleEndian, v)
}
fn u64(v: u64) -> U64Bytes<LittleEndian> {
    U64Bytes::new(LittleEndian, v)
}

impl ModulesListHeader {
    pub fn new(count: u32, total_size: u32) -> Self {
        Self {
            magic: u64(BL_MODULES_LIST_MAGIC),
            count: u32(count),
            total_size: u32(total_size),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic.get(LittleEndian) == BL_MODULES_LIST_MAGIC
    }

    pub fn count(&self) -> u32 {
        self.count.get(LittleEndian)
    }

    pub fn total_size(&self) -> u32 {
        self.total_size.get(LittleEndian)
    }
}

impl ModuleHeader {
    pub fn new(size: u32) -> Self {
        Self {
            magic: u64(BL_MODULE_MAGIC),
            size: u32(size),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic.get(LittleEndian) == BL_MODULE_MAGIC
    }

    pub fn size(&self) -> u32 {
        self.size.get(LittleEndian)
    }
}
