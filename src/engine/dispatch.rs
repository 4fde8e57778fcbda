// src/engine/dispatch.rs
use crate::input::{KeyInfo, SkyAction};
use super::system_vars::{FastMode, SystemVars};

/// Most recent action and key since the last dispatch. Later input
/// overwrites earlier input; nothing is queued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingInput {
    pub action: SkyAction,
    pub key: Option<KeyInfo>,
}

impl PendingInput {
    pub fn set_action(&mut self, action: SkyAction) {
        self.action = action;
    }

    pub fn set_key(&mut self, key: KeyInfo) {
        self.key = Some(key);
    }

    pub fn is_empty(&self) -> bool {
        self.action == SkyAction::None && self.key.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Subsystem calls the dispatcher can make.
pub trait DispatchTarget {
    fn unpause_effects(&mut self);
    fn restore_palette(&mut self, palette: u32);
    fn halve_palette(&mut self);
    fn pause_effects(&mut self);
    fn open_control_panel(&mut self);
    fn restart_game(&mut self);
    fn logic_click(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Idle,
    Resumed,
    Action(SkyAction),
}

/// Consumes the pending slots for this frame.
///
/// While paused, any action or key resumes. Otherwise the action is
/// carried out. Both slots are empty afterwards.
pub fn dispatch(
    pending: &mut PendingInput,
    vars: &mut SystemVars,
    fast_mode: &mut FastMode,
    target: &mut dyn DispatchTarget,
) -> Dispatched {
    let input = std::mem::take(pending);

    if !input.is_empty() && vars.paused() {
        vars.resume();
        target.unpause_effects();
        target.restore_palette(vars.current_palette);
        log::debug!("Resumed from pause");
        return Dispatched::Resumed;
    }

    match input.action {
        SkyAction::None => return Dispatched::Idle,
        SkyAction::ToggleFastMode => fast_mode.toggle(FastMode::FAST),
        SkyAction::ToggleReallyFastMode => fast_mode.toggle(FastMode::REALLY_FAST),
        SkyAction::OpenControlPanel => target.open_control_panel(),
        SkyAction::Skip => {
            if !vars.past_intro {
                target.restart_game();
            }
        }
        SkyAction::SkipLine => target.logic_click(),
        SkyAction::Pause => {
            if vars.pause() {
                target.halve_palette();
                target.pause_effects();
                log::debug!("Paused");
            }
        }
    }

    Dispatched::Action(input.action)
}
