// src/subsystems/mod.rs
//! Contracts for the game subsystems the engine drives each frame.
//!
//! The engine owns every subsystem. Logic and control are reachable from
//! each other (and mouse from logic), so those two live behind
//! `Rc<RefCell<..>>` held only by the engine; the cross links are `Weak`.

use std::cell::RefCell;
use std::io::{Read, Seek};
use std::rc::{Rc, Weak};

use crate::{
    disk::Disk,
    engine::SystemVars,
    errors::SkyError,
    language::LanguageCode,
    locator::{SignatureEntry, CHINESE_EXECUTABLES},
};

pub type Shared<T> = Rc<RefCell<T>>;
pub type LogicLink = Weak<RefCell<dyn Logic>>;
pub type ControlLink = Weak<RefCell<dyn Control>>;

pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

pub trait Platform {
    fn millis(&self) -> u32;
    fn delay_millis(&mut self, amount: u32);
    fn update_screen(&mut self);
    fn should_quit(&self) -> bool;
}

pub trait Sound {
    fn check_fx_queue(&mut self);
    fn pause_fx(&mut self);
    fn unpause_fx(&mut self);
}

pub trait MusicDriver {
    /// `level` is in `0..=127`.
    fn set_volume(&mut self, level: u8);
    fn stop_music(&mut self);
}

pub trait Compact {
    fn fetch_cpt(&self, id: u32) -> Option<&[u8]>;
}

pub trait Text {
    fn select_language(&mut self, language: LanguageCode);
}

pub trait Mouse {
    fn mouse_engine(&mut self);
    fn mouse_moved(&mut self, x: i32, y: i32);
    fn button_pressed(&mut self, button: u16);
    fn logic_click(&mut self);
    fn use_logic_instance(&mut self, logic: LogicLink);
}

pub trait Screen {
    fn set_palette(&mut self, id: u16);
    fn set_palette_data(&mut self, palette: &[u8]);
    fn halve_palette(&mut self);
    fn show_screen(&mut self, id: u16);
    fn clear_screen(&mut self, full: bool);
    fn process_sequence(&mut self);
    fn recreate(&mut self);
    fn sprite_engine(&mut self);
    fn show_grid(&mut self, grid: &[u8]);
    fn force_refresh(&mut self);
    fn flip(&mut self);
}

pub trait Logic {
    fn engine(&mut self);
    fn init_screen0(&mut self);
    /// Walk grid of the current screen, if it has one.
    fn give_grid(&self) -> Option<Vec<u8>>;
    fn use_control_instance(&mut self, control: ControlLink);
}

pub trait Control {
    fn do_control_panel(&mut self);
    fn restart_game(&mut self);
    /// Returns `true` when the slot was restored.
    fn quick_restore(&mut self, slot: u16) -> bool;
    fn show_game_quit_msg(&mut self);
}

pub trait Intro {
    /// Returns `false` when the player skipped the intro.
    fn do_intro(&mut self, floppy_intro: bool) -> bool;
}

/// Capability reported by music device detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicDevice {
    AdLib,
    Mt32,
    GeneralMidi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicDriverKind {
    AdLib,
    Mt32,
    GeneralMidi,
}

/// Read-only view of what has been built so far, handed to later
/// constructors.
pub struct BootContext<'a> {
    pub disk: &'a dyn Disk,
    pub sound: &'a dyn Sound,
    pub music: &'a dyn MusicDriver,
    pub compact: &'a dyn Compact,
    pub text: &'a dyn Text,
    pub mouse: &'a dyn Mouse,
    pub screen: &'a dyn Screen,
    pub vars: &'a SystemVars,
}

/// Builds the concrete subsystems. Called in a fixed order by the engine
/// bootstrapper.
pub trait SubsystemFactory {
    fn open_disk(&mut self) -> Result<Box<dyn Disk>, SkyError>;
    fn create_sound(&mut self, disk: &mut dyn Disk) -> Result<Box<dyn Sound>, SkyError>;
    fn detect_music_device(&mut self) -> MusicDevice;
    fn create_music(
        &mut self,
        kind: MusicDriverKind,
        disk: &mut dyn Disk,
    ) -> Result<Box<dyn MusicDriver>, SkyError>;
    fn create_compact(&mut self) -> Result<Box<dyn Compact>, SkyError>;
    fn create_text(
        &mut self,
        disk: &mut dyn Disk,
        compact: &dyn Compact,
    ) -> Result<Box<dyn Text>, SkyError>;
    fn create_mouse(
        &mut self,
        disk: &mut dyn Disk,
        compact: &dyn Compact,
    ) -> Result<Box<dyn Mouse>, SkyError>;
    fn create_screen(
        &mut self,
        disk: &mut dyn Disk,
        compact: &dyn Compact,
    ) -> Result<Box<dyn Screen>, SkyError>;
    fn create_logic(&mut self, ctx: &BootContext<'_>) -> Result<Shared<dyn Logic>, SkyError>;
    fn create_control(
        &mut self,
        ctx: &BootContext<'_>,
        logic: LogicLink,
    ) -> Result<Shared<dyn Control>, SkyError>;
    fn create_intro(&mut self) -> Result<Box<dyn Intro>, SkyError>;
    /// Opens a loose file from the game directory, e.g. `sky.exe`.
    fn open_game_file(&mut self, name: &str) -> Option<Box<dyn ReadSeek>>;

    /// Known traditional Chinese builds of `sky.exe`.
    fn chinese_executables(&self) -> &[SignatureEntry] {
        CHINESE_EXECUTABLES
    }
}
