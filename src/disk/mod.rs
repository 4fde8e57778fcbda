// src/disk/mod.rs
use crate::errors::SkyError;

/// Resource pack access. Decoding of the packed formats lives behind this
/// trait; the engine only needs lookups by numeric file id.
pub trait Disk {
    fn load_file(&mut self, id: u16) -> Result<Vec<u8>, SkyError>;
    fn file_exists(&self, id: u16) -> bool;
    fn determine_game_version(&self) -> u16;
}

/// A detected data-file release, classified once at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameBuild {
    pub version: u16,
    pub demo: bool,
    pub cd: bool,
}

impl GameBuild {
    pub fn classify(version: u16) -> Result<Self, SkyError> {
        let (demo, cd) = match version {
            109 => (true, false), // PC Gamer demo
            267 => (true, false), // English floppy demo
            272 => (true, false), // German floppy demo
            365 => (true, true),  // CD demo
            288 | 303 | 331 | 348 => (false, false),
            368 | 372 => (false, true),
            _ => {
                log::error!("Unknown game version {}", version);
                return Err(SkyError::UnknownGameVersion(version));
            }
        };

        Ok(Self { version, demo, cd })
    }

    /// Floppy demos ship without the intro sequence.
    pub fn has_intro(&self) -> bool {
        self.version > 272
    }
}
