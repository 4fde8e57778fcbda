// src/engine/mod.rs
pub mod boot;
pub mod dispatch;
pub mod pacing;
pub mod system_vars;

pub use boot::Subsystems;
pub use dispatch::{Dispatched, PendingInput};
pub use pacing::FramePacer;
pub use system_vars::{FastMode, SystemFlags, SystemVars};

use crate::{
    assets::ItemTable,
    config::{self, ConfigStore},
    disk::GameBuild,
    errors::SkyError,
    input::{EngineEvent, EventSource},
    locator::ResolvedBlock,
    subsystems::{Compact, Control, Intro, Mouse, Platform, Screen, Shared, Sound},
};
use dispatch::DispatchTarget;

pub const MAX_SAVE_GAMES: i64 = 999;
/// Display refresh interval while paused.
const PAUSE_POLL_DELAY: u32 = 50;
/// Longest single sleep inside `delay`, so input stays responsive.
const DELAY_SLICE: u32 = 10;
const QUIT_GRACE_DELAY: u32 = 1500;

pub struct SkyEngine {
    subsystems: Subsystems,
    vars: SystemVars,
    build: GameBuild,
    items: ItemTable,
    chinese: Option<ResolvedBlock>,
    intro: Option<Box<dyn Intro>>,
    config: ConfigStore,
    platform: Box<dyn Platform>,
    events: Box<dyn EventSource>,
    pending: PendingInput,
    fast_mode: FastMode,
    show_grid: bool,
}

/// Dispatcher view over the subsystems it may call.
struct EngineHooks<'a> {
    sound: &'a mut dyn Sound,
    screen: &'a mut dyn Screen,
    compact: &'a dyn Compact,
    mouse: &'a mut dyn Mouse,
    control: &'a Shared<dyn Control>,
}

impl DispatchTarget for EngineHooks<'_> {
    fn unpause_effects(&mut self) {
        self.sound.unpause_fx();
    }

    fn restore_palette(&mut self, palette: u32) {
        match self.compact.fetch_cpt(palette) {
            Some(data) => self.screen.set_palette_data(data),
            None => log::warn!("Palette compact {} is missing", palette),
        }
    }

    fn halve_palette(&mut self) {
        self.screen.halve_palette();
    }

    fn pause_effects(&mut self) {
        self.sound.pause_fx();
    }

    fn open_control_panel(&mut self) {
        self.control.borrow_mut().do_control_panel();
    }

    fn restart_game(&mut self) {
        self.control.borrow_mut().restart_game();
    }

    fn logic_click(&mut self) {
        self.mouse.logic_click();
    }
}

impl SkyEngine {
    pub fn vars(&self) -> &SystemVars {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut SystemVars {
        &mut self.vars
    }

    pub fn build(&self) -> GameBuild {
        self.build
    }

    pub fn items(&self) -> &ItemTable {
        &self.items
    }

    pub fn fetch_item(&self, id: u16) -> Option<&[u8]> {
        self.items.fetch(id)
    }

    pub fn chinese_traditional(&self) -> Option<&ResolvedBlock> {
        self.chinese.as_ref()
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigStore {
        &mut self.config
    }

    pub fn fast_mode(&self) -> FastMode {
        self.fast_mode
    }

    pub fn pending(&self) -> &PendingInput {
        &self.pending
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    pub fn should_quit(&self) -> bool {
        self.platform.should_quit()
    }

    /// Pushes mute flags and music volume from the config to the
    /// subsystems, then persists the config. A failed write is logged and
    /// the in-memory settings stay in effect.
    pub fn sync_sound_settings(&mut self) {
        if self.config.get_bool("sfx_mute") {
            self.vars.flags |= SystemFlags::FX_OFF;
        }
        if self.config.get_bool("music_mute") {
            self.vars.flags |= SystemFlags::MUS_OFF;
        }
        self.subsystems.music.set_volume(config::music_volume(&self.config));
        if let Err(e) = self.config.flush_to_disk() {
            log::warn!("Failed to save sound settings: {}", e);
        }
    }

    /// Runs the game until the platform asks to quit.
    pub fn go(&mut self) -> Result<(), SkyError> {
        self.pending.clear();

        if !self.quick_restore() {
            self.vars.past_intro = false;
            let mut intro_skipped = false;
            if let Some(mut intro) = self.intro.take() {
                intro_skipped = !intro.do_intro(self.config.get_bool("alt_intro"));
            }

            if !self.should_quit() {
                self.subsystems.screen.clear_screen(true);
                if intro_skipped {
                    self.subsystems.control.borrow_mut().restart_game();
                } else {
                    self.subsystems.logic.borrow_mut().init_screen0();
                }
            }
        }

        let mut pacer = FramePacer::new(self.platform.millis());
        while !self.should_quit() {
            self.run_frame(&mut pacer);
        }

        self.shutdown();
        Ok(())
    }

    fn quick_restore(&mut self) -> bool {
        if !self.config.has_key("save_slot") {
            return false;
        }
        let slot = self.config.get_int("save_slot");
        if !(0..=MAX_SAVE_GAMES).contains(&slot) {
            log::warn!("Ignoring out of range save slot {}", slot);
            return false;
        }

        let restored = self.subsystems.control.borrow_mut().quick_restore(slot as u16);
        log::info!("Quick restore of slot {}: {}", slot, restored);
        restored
    }

    /// One pass of the main loop, including the pause wait and the pacing
    /// delay.
    pub fn run_frame(&mut self, pacer: &mut FramePacer) {
        self.subsystems.sound.check_fx_queue();
        self.subsystems.mouse.mouse_engine();
        self.handle_key();

        if self.vars.paused() {
            while self.vars.paused() && !self.should_quit() {
                self.platform.update_screen();
                self.delay(PAUSE_POLL_DELAY);
                self.handle_key();
            }
            pacer.resync(self.platform.millis());
            if self.should_quit() {
                return;
            }
        }

        self.subsystems.logic.borrow_mut().engine();
        let screen = &mut self.subsystems.screen;
        screen.process_sequence();
        screen.recreate();
        screen.sprite_engine();
        if self.show_grid {
            if let Some(grid) = self.subsystems.logic.borrow().give_grid() {
                screen.show_grid(&grid);
                screen.force_refresh();
            }
        }
        screen.flip();

        let wait = pacer.frame_delay(self.fast_mode, self.vars.game_speed, self.platform.millis());
        self.delay(wait);
    }

    /// Consumes the pending action and key.
    pub fn handle_key(&mut self) -> Dispatched {
        let subsystems = &mut self.subsystems;
        let mut hooks = EngineHooks {
            sound: &mut *subsystems.sound,
            screen: &mut *subsystems.screen,
            compact: &*subsystems.compact,
            mouse: &mut *subsystems.mouse,
            control: &subsystems.control,
        };
        dispatch::dispatch(&mut self.pending, &mut self.vars, &mut self.fast_mode, &mut hooks)
    }

    /// Waits `amount` ms while draining input. The pending slots only hold
    /// input that arrived during this call.
    pub fn delay(&mut self, amount: u32) {
        let start = self.platform.millis();
        self.pending.clear();

        loop {
            while let Some(event) = self.events.poll_event() {
                self.handle_event(event);
            }

            self.platform.update_screen();

            let elapsed = self.platform.millis().wrapping_sub(start);
            if elapsed >= amount {
                break;
            }
            self.platform.delay_millis((amount - elapsed).min(DELAY_SLICE));
        }
    }

    fn handle_event(&mut self, event: EngineEvent) {
        let mouse_locked = self.vars.mouse_locked();
        let mouse = &mut self.subsystems.mouse;
        match event {
            EngineEvent::CustomActionStart(action) => self.pending.set_action(action),
            EngineEvent::KeyDown(key) => self.pending.set_key(key),
            EngineEvent::MouseMove { x, y } => {
                if !mouse_locked {
                    mouse.mouse_moved(x, y);
                }
            }
            EngineEvent::MouseButtonDown { button, x, y } => {
                if !mouse_locked {
                    mouse.mouse_moved(x, y);
                }
                mouse.button_pressed(button.game_number());
            }
        }
    }

    fn shutdown(&mut self) {
        log::info!("Shutting down");
        self.subsystems.control.borrow_mut().show_game_quit_msg();
        self.subsystems.music.stop_music();
        if let Err(e) = self.config.flush_to_disk() {
            log::error!("Failed to save settings: {}", e);
        }
        self.delay(QUIT_GRACE_DELAY);
    }
}
