// src/locator/signatures.rs

/// One known build of a third-party executable.
///
/// `virtual_base` is the file offset of virtual address 0; the index at
/// `index_offset` holds 8 pointers relative to it. `block_end` only has to
/// cover the end of the pointed-to data, so it may over-read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureEntry {
    pub md5: &'static str,
    pub length: u64,
    pub virtual_base: u32,
    pub index_offset: u64,
    pub font_offset: u64,
    pub block_end: u64,
}

/// Traditional Chinese releases of `sky.exe`.
pub const CHINESE_EXECUTABLES: &[SignatureEntry] = &[SignatureEntry {
    md5: "7bc128ba9bfaecb9bb4ef328b756057a",
    length: 575538,
    virtual_base: 0x5191,
    index_offset: 0x6427e,
    font_offset: 0x54afc,
    block_end: 0x7eee1,
}];
