// src/locator/mod.rs
pub mod signatures;

pub use signatures::{SignatureEntry, CHINESE_EXECUTABLES};

use std::io::{self, Read, Seek, SeekFrom};
use byteorder::{LittleEndian, ReadBytesExt};
use md5::{Digest, Md5};
use crate::{
    assets::{Big5Font, CHINESE_TRADITIONAL_HEIGHT},
    errors::SkyError,
};

pub const SECTION_COUNT: usize = 8;

/// String sections and font recovered from a recognised executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBlock {
    offsets: [u32; SECTION_COUNT],
    block: Vec<u8>,
    font: Big5Font,
}

impl ResolvedBlock {
    /// Section offsets into `block`; the smallest is always 0.
    pub fn offsets(&self) -> &[u32; SECTION_COUNT] {
        &self.offsets
    }

    pub fn block(&self) -> &[u8] {
        &self.block
    }

    pub fn font(&self) -> &Big5Font {
        &self.font
    }

    /// The bytes from the start of section `index` to the end of the block.
    pub fn section(&self, index: usize) -> Option<&[u8]> {
        let start = *self.offsets.get(index)? as usize;
        self.block.get(start..)
    }
}

/// Hashes the whole stream, returning the lowercase hex MD5 and byte length.
pub fn fingerprint<R: Read + Seek>(stream: &mut R) -> io::Result<(String, u64)> {
    stream.seek(SeekFrom::Start(0))?;
    let mut hasher = Md5::new();
    let length = io::copy(stream, &mut hasher)?;
    Ok((format!("{:x}", hasher.finalize()), length))
}

pub fn locate<R: Read + Seek>(stream: &mut R) -> Result<Option<ResolvedBlock>, SkyError> {
    locate_in(stream, CHINESE_EXECUTABLES)
}

/// Matches the stream against `table` by exact hash and length.
///
/// `Ok(None)` means the build is not known, including a stream that cannot
/// be hashed. Once an entry matches, its offsets are trusted and any read
/// failure is an `Extraction` error.
pub fn locate_in<R: Read + Seek>(
    stream: &mut R,
    table: &[SignatureEntry],
) -> Result<Option<ResolvedBlock>, SkyError> {
    let (md5, length) = match fingerprint(stream) {
        Ok(fingerprint) => fingerprint,
        Err(e) => {
            log::warn!("Could not fingerprint executable: {}", e);
            return Ok(None);
        }
    };

    let Some(entry) = table
        .iter()
        .find(|entry| entry.md5 == md5 && entry.length == length)
    else {
        log::info!("No known executable matches md5 {} ({} bytes)", md5, length);
        return Ok(None);
    };

    log::info!("Recognised executable {} ({} bytes)", entry.md5, entry.length);
    extract(stream, entry).map(Some).map_err(|e| {
        log::error!("Extraction from recognised executable failed: {}", e);
        e
    })
}

fn extraction_error(what: &'static str) -> impl FnOnce(io::Error) -> SkyError {
    move |e| SkyError::Extraction(format!("Failed to read {}: {}", what, e))
}

fn extract<R: Read + Seek>(
    stream: &mut R,
    entry: &SignatureEntry,
) -> Result<ResolvedBlock, SkyError> {
    stream
        .seek(SeekFrom::Start(entry.index_offset))
        .map_err(extraction_error("section index"))?;

    let mut offsets = [0u32; SECTION_COUNT];
    for offset in offsets.iter_mut() {
        let pointer = stream
            .read_u32::<LittleEndian>()
            .map_err(extraction_error("section index"))?;
        *offset = pointer.checked_add(entry.virtual_base).ok_or_else(|| {
            SkyError::Extraction(format!("Section pointer {:#x} overflows the file", pointer))
        })?;
    }

    // The block has no header; its start is the lowest section pointer.
    let block_start = offsets.iter().copied().min().unwrap_or(0);
    for offset in offsets.iter_mut() {
        *offset -= block_start;
    }

    let block_len = entry
        .block_end
        .checked_sub(block_start as u64)
        .filter(|len| *len > 0)
        .ok_or_else(|| {
            SkyError::Extraction(format!(
                "Block end {:#x} is not past block start {:#x}",
                entry.block_end, block_start
            ))
        })?;
    if let Some(offset) = offsets.iter().find(|offset| **offset as u64 >= block_len) {
        return Err(SkyError::Extraction(format!(
            "Section offset {:#x} lies outside the {:#x} byte block",
            offset, block_len
        )));
    }

    let mut block = vec![0u8; block_len as usize];
    stream
        .seek(SeekFrom::Start(block_start as u64))
        .map_err(extraction_error("string block"))?;
    stream
        .read_exact(&mut block)
        .map_err(extraction_error("string block"))?;

    stream
        .seek(SeekFrom::Start(entry.font_offset))
        .map_err(extraction_error("font"))?;
    let font = Big5Font::load_prefixed_raw(stream, CHINESE_TRADITIONAL_HEIGHT)?;

    log::info!(
        "Extracted {} byte string block and {} glyphs",
        block.len(),
        font.len()
    );

    Ok(ResolvedBlock { offsets, block, font })
}
