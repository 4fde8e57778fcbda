// src/engine/pacing.rs
use super::system_vars::FastMode;

/// Delay used when only the fast bit is set.
pub const FAST_FRAME_DELAY: u32 = 10;

/// Tracks when the next frame is due against the millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    delay_count: u32,
}

impl FramePacer {
    pub fn new(now: u32) -> Self {
        Self { delay_count: now }
    }

    pub fn resync(&mut self, now: u32) {
        self.delay_count = now;
    }

    pub fn anchor(&self) -> u32 {
        self.delay_count
    }

    /// Milliseconds to wait before the next frame.
    ///
    /// At normal speed the anchor advances by `game_speed` per frame. If the
    /// frame is late, or the wait would exceed one frame, the anchor snaps to
    /// `now` and no delay is requested.
    pub fn frame_delay(&mut self, fast: FastMode, game_speed: u32, now: u32) -> u32 {
        if fast.contains(FastMode::REALLY_FAST) {
            return 0;
        }
        if fast.contains(FastMode::FAST) {
            return FAST_FRAME_DELAY;
        }

        self.delay_count = self.delay_count.wrapping_add(game_speed);
        let need = self.delay_count.wrapping_sub(now) as i32;
        if need < 0 || need as u32 > game_speed {
            self.delay_count = now;
            return 0;
        }
        need as u32
    }
}
