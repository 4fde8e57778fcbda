// src/engine/system_vars.rs
use bitflags::bitflags;
use crate::language::LanguageCode;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SystemFlags: u32 {
        const SBLASTER = 1 << 0;
        const ROLAND = 1 << 1;
        const ALLOW_TEXT = 1 << 2;
        const ALLOW_SPEECH = 1 << 3;
        const PLAY_VOCS = 1 << 4;
        const FX_OFF = 1 << 5;
        const MUS_OFF = 1 << 6;
        const MOUSE_LOCKED = 1 << 7;
    }
}

bitflags! {
    /// Frame pacing overrides; both may be set at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FastMode: u8 {
        const FAST = 1;
        const REALLY_FAST = 2;
    }
}

pub const INITIAL_PALETTE: u32 = 4316;
/// Milliseconds per frame at normal speed.
pub const DEFAULT_GAME_SPEED: u32 = 80;

/// Engine-wide state, one instance per running game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemVars {
    pub flags: SystemFlags,
    pub game_version: u16,
    pub language: LanguageCode,
    pub text_dir_rtl: bool,
    pub current_palette: u32,
    pub game_speed: u32,
    pub current_music: u16,
    pub past_intro: bool,
    paused: bool,
}

impl SystemVars {
    pub fn new() -> Self {
        Self {
            flags: SystemFlags::empty(),
            game_version: 0,
            language: LanguageCode::English,
            text_dir_rtl: false,
            current_palette: INITIAL_PALETTE,
            game_speed: 0,
            current_music: 0,
            past_intro: false,
            paused: false,
        }
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Returns `false` if already paused.
    pub fn pause(&mut self) -> bool {
        !std::mem::replace(&mut self.paused, true)
    }

    /// Returns `false` if not paused.
    pub fn resume(&mut self) -> bool {
        std::mem::replace(&mut self.paused, false)
    }

    pub fn mouse_locked(&self) -> bool {
        self.flags.contains(SystemFlags::MOUSE_LOCKED)
    }
}

impl Default for SystemVars {
    fn default() -> Self {
        Self::new()
    }
}
