//! World-to-screen mapping around a smoothed focus point.
//!
//! `screen = viewport / 2 + round(-scale * focus) + scale * world`, with an
//! integer zoom so tiles stay pixel-exact.

use std::collections::VecDeque;

use glam::DVec2;
use hop_core::{ScreenRect, WorldRect};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Sub-pixel centre of the view in world coordinates.
    pub focus: DVec2,
    pub scale: i32,
    pub viewport: (i32, i32),
    shake: VecDeque<DVec2>,
}

impl Camera {
    pub fn new(focus: DVec2) -> Self {
        Self {
            focus,
            scale: 1,
            viewport: (0, 0),
            shake: VecDeque::new(),
        }
    }

    /// Zoom so at least `visible_width` world pixels fit across, never below 1x.
    pub fn update_viewport(&mut self, width: u32, height: u32, visible_width: i32) {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        self.viewport = (width, height);
        self.scale = (width / visible_width.max(1)).max(1);
    }

    /// Computed in `i64` and clamped into `i32`, so rects far outside the
    /// level land off-screen instead of overflowing.
    pub fn world_to_screen_rect(&self, rect: WorldRect) -> ScreenRect {
        let scale = i64::from(self.scale);
        let axis = |viewport: i32, focus: f64, world: i32| {
            // Half away from zero, as `hop_core::round`, without the i32 cap.
            let pan = (-f64::from(self.scale) * focus).round() as i64;
            clamp_to_i32(i64::from(viewport / 2) + pan + scale * i64::from(world))
        };
        ScreenRect {
            x: axis(self.viewport.0, self.focus.x, rect.x),
            y: axis(self.viewport.1, self.focus.y, rect.y),
            width: clamp_to_i32(scale * i64::from(rect.width)),
            height: clamp_to_i32(scale * i64::from(rect.height)),
        }
    }

    /// Move the focus a `drag` fraction of the way towards `target`.
    pub fn follow(&mut self, target: DVec2, drag: f64) {
        self.focus = target * drag + self.focus * (1.0 - drag);
    }

    /// Queue a shake of the given intensity. Does nothing while a previous
    /// shake is still playing; returns whether a shake was started.
    pub fn shake(&mut self, intensity: f64) -> bool {
        if !self.shake.is_empty() {
            return false;
        }
        let x = intensity;
        self.shake.extend([
            DVec2::new(-3.0 * x, 0.0),
            DVec2::new(0.0, -2.0 * x),
            DVec2::new(x, 0.0),
            DVec2::new(0.0, 4.0 * x),
            DVec2::new(2.0 * x, 0.0),
            DVec2::new(0.0, -2.0 * x),
            DVec2::new(2.0 * x, -3.0 * x),
            DVec2::new(-2.0 * x, 3.0 * x),
        ]);
        true
    }

    #[allow(dead_code)]
    pub fn pending_shake(&self) -> usize {
        self.shake.len()
    }

    /// Add the next shake offset to the focus, if any.
    pub fn apply_shake(&mut self) -> Option<DVec2> {
        let offset = self.shake.pop_front()?;
        self.focus += offset;
        Some(offset)
    }
}

fn clamp_to_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
