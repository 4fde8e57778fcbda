// src/assets/mod.rs
pub mod font;

pub use font::{Big5Font, CHINESE_TRADITIONAL_HEIGHT};

use crate::{disk::Disk, errors::SkyError};

pub const ITEM_TABLE_SIZE: usize = 300;

/// Items every build needs resident from boot.
pub const FIXED_ITEMS: [u16; 4] = [49, 50, 73, 262];
/// Items absent from demo data files.
pub const FULL_GAME_ITEMS: [u16; 9] = [36, 263, 264, 265, 266, 267, 269, 271, 272];

/// Resident data files addressed by item number.
pub struct ItemTable {
    items: Vec<Option<Vec<u8>>>,
}

impl ItemTable {
    pub fn new() -> Self {
        Self {
            items: vec![None; ITEM_TABLE_SIZE],
        }
    }

    pub fn load(&mut self, disk: &mut dyn Disk, id: u16) -> Result<(), SkyError> {
        let slot = self.items.get_mut(id as usize).ok_or_else(|| {
            SkyError::Resource(format!("Item {} is outside the item table", id))
        })?;
        *slot = Some(disk.load_file(id)?);
        Ok(())
    }

    pub fn load_fixed_items(&mut self, disk: &mut dyn Disk, demo: bool) -> Result<(), SkyError> {
        for id in FIXED_ITEMS {
            self.load(disk, id)?;
        }
        if !demo {
            for id in FULL_GAME_ITEMS {
                self.load(disk, id)?;
            }
        }

        log::info!("Loaded {} fixed items", self.loaded_count());
        Ok(())
    }

    pub fn fetch(&self, id: u16) -> Option<&[u8]> {
        self.items.get(id as usize)?.as_deref()
    }

    pub fn is_loaded(&self, id: u16) -> bool {
        self.fetch(id).is_some()
    }

    pub fn loaded_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.items.iter_mut().for_each(|item| *item = None);
    }
}

impl Default for ItemTable {
    fn default() -> Self {
        Self::new()
    }
}
