//! Keyboard state with both level-triggered and edge-triggered queries.
//!
//! - **Held:** `is_held(key)` is true every frame the key is physically down.
//!   Movement reads this.
//! - **Just pressed / just released:** true only for the frame the transition
//!   happened. The frame driver clears them with `end_frame()` once a tick has
//!   consumed them, so a press landing on a frame without a tick is kept.
//!
//! The jump edge is not taken from here: the world derives it from its own
//! previous `up` sample, so a jump needs a release between two presses even
//! when key-repeat events arrive.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Escape,
    Enter,
    NumEnter,
    F11,
    LeftAlt,
    RightAlt,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// F11, or Alt together with either Enter key.
    pub fn fullscreen_toggled(&self) -> bool {
        let alt = self.is_held(Key::LeftAlt) || self.is_held(Key::RightAlt);
        let enter = self.is_just_pressed(Key::Enter) || self.is_just_pressed(Key::NumEnter);
        self.is_just_pressed(Key::F11) || (alt && enter)
    }

    /// Drop every held key, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn release_all(&mut self) {
        let held: Vec<Key> = self.held.iter().copied().collect();
        for key in held {
            self.key_up(key);
        }
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        assert!(input.is_held(Key::Up));
        assert!(input.is_just_pressed(Key::Up));
    }

    #[test]
    fn key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_up(Key::Left);
        assert!(!input.is_held(Key::Left));
        assert!(input.is_just_released(Key::Left));
    }

    #[test]
    fn key_repeat_does_not_restart_press() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.end_frame();
        input.key_down(Key::Up);
        assert!(input.is_held(Key::Up));
        assert!(!input.is_just_pressed(Key::Up));
    }

    #[test]
    fn key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::Right);
        assert!(!input.is_just_released(Key::Right));
        assert!(!input.is_held(Key::Right));
    }

    #[test]
    fn end_frame_keeps_held_keys() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Up);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::Left));
        assert!(!input.is_just_pressed(Key::Up));
        assert!(input.is_held(Key::Left));
        assert!(input.is_held(Key::Up));
    }

    #[test]
    fn fullscreen_toggle_accepts_f11_and_alt_enter() {
        let mut input = InputState::new();
        input.key_down(Key::F11);
        assert!(input.fullscreen_toggled());
        input.end_frame();
        assert!(!input.fullscreen_toggled(), "F11 is edge-triggered");

        input.key_down(Key::RightAlt);
        input.key_down(Key::NumEnter);
        assert!(input.fullscreen_toggled());
        input.end_frame();

        input.key_up(Key::RightAlt);
        input.key_up(Key::NumEnter);
        input.key_down(Key::Enter);
        assert!(!input.fullscreen_toggled(), "Enter alone must not toggle");
    }

    #[test]
    fn release_all_reports_releases() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Up);
        input.end_frame();
        input.release_all();
        assert!(!input.is_held(Key::Left));
        assert!(input.is_just_released(Key::Up));
    }
}
