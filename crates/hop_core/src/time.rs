//! Fixed-tick pacing for the frame driver.
//!
//! One simulation tick is one 60 Hz frame. Wall-clock time feeds an
//! accumulator, but a rendered frame grants **at most one** tick: when the
//! display runs slower than 60 Hz the game slows down instead of running
//! several ticks back to back, and when it runs faster some frames render
//! without a tick.

use std::time::Instant;

pub const TICK_SECONDS: f64 = 1.0 / 60.0;

/// Longest frame that is still credited in full.
const MAX_FRAME_SECONDS: f64 = 0.25;

pub struct TimeState {
    pub tick_count: u64,
    accumulator: f64,
    ticked_this_frame: bool,
    last_instant: Instant,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            accumulator: 0.0,
            ticked_this_frame: false,
            last_instant: Instant::now(),
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.feed(elapsed);
    }

    /// Account for `elapsed` seconds of wall-clock time and start a new frame.
    pub fn feed(&mut self, elapsed: f64) {
        if elapsed > MAX_FRAME_SECONDS {
            log::warn!(
                "Frame took {:.1}ms, capping to {}ms",
                elapsed * 1000.0,
                MAX_FRAME_SECONDS * 1000.0
            );
        }
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_SECONDS);
        self.ticked_this_frame = false;
    }

    pub fn should_step(&mut self) -> bool {
        if self.ticked_this_frame {
            // Whatever is left over is dropped rather than replayed later.
            self.accumulator = self.accumulator.min(TICK_SECONDS);
            return false;
        }
        if self.accumulator < TICK_SECONDS {
            return false;
        }
        self.accumulator -= TICK_SECONDS;
        self.tick_count += 1;
        self.ticked_this_frame = true;
        true
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
