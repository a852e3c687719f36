//! Axis-stepped motion of the character through the level grid.
//!
//! Movement is resolved one pixel at a time against `Level::collides_downward`
//! at the character's collider point. Horizontally, every pixel re-probes the
//! ground so the character hugs ramps; vertically, falls stop on the first
//! colliding pixel. Rising is never blocked (there are no ceilings).

use hop_core::round;

use crate::character::Character;
use crate::level::Level;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    /// Up went down this tick.
    pub up_pressed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    pub jumped: bool,
    /// Shake intensity requested by a hard landing.
    pub landing_shake: Option<f64>,
}

pub fn step_character(
    guy: &mut Character,
    input: CharacterInput,
    level: &Level,
    tuning: &Tuning,
) -> StepOutcome {
    step_horizontal(guy, input, level, tuning);
    step_vertical(guy, input, level, tuning)
}

pub fn step_horizontal(guy: &mut Character, input: CharacterInput, level: &Level, tuning: &Tuning) {
    let mut acceleration = 0;
    if input.left {
        acceleration = -1;
    }
    if input.right {
        acceleration = 1;
    }
    if input.left == input.right {
        acceleration = 0;
        guy.speed_x = 0;
    }
    guy.speed_x = (guy.speed_x + acceleration).clamp(-tuning.max_x_speed, tuning.max_x_speed);
    if guy.speed_x < 0 {
        guy.facing_left = true;
    }
    if guy.speed_x > 0 {
        guy.facing_left = false;
    }

    let (mut x, mut y) = guy.collider();
    let step = guy.speed_x.signum();
    for _ in 0..guy.speed_x.abs() {
        guy.bounds.translate(step, 0);
        x = x.saturating_add(step);
        // Ground-follow: sink onto a descending surface, climb out of an
        // ascending one.
        if level.collides_downward(x, y.saturating_add(2)) {
            guy.bounds.translate(0, 1);
            y = y.saturating_add(1);
        } else if level.collides_downward(x, y) {
            guy.bounds.translate(0, -1);
            y = y.saturating_sub(1);
        }
    }
}

pub fn step_vertical(
    guy: &mut Character,
    input: CharacterInput,
    level: &Level,
    tuning: &Tuning,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    let holding_jump = input.up && guy.jump_since <= tuning.jump_hold_ticks;
    if !holding_jump {
        guy.speed_y += tuning.gravity;
    }
    if !input.up {
        guy.jump_since = tuning.jump_hold_ticks;
    }

    let (x, y) = guy.collider();
    guy.on_ground = level.collides_downward(x, y.saturating_add(1)) && guy.speed_y >= 0.0;
    if input.up_pressed && guy.speed_y != 0.0 && guy.on_ground {
        guy.speed_y = tuning.jump_speed;
        guy.jump_since = 0;
        outcome.jumped = true;
    }

    let mut dy = round(guy.speed_y);
    while dy > 0 {
        guy.bounds.translate(0, 1);
        let (x, y) = guy.collider();
        if level.collides_downward(x, y) {
            guy.bounds.translate(0, -1);
            if guy.speed_y >= tuning.hard_landing_speed {
                let intensity = (guy.speed_y - tuning.hard_landing_speed) / tuning.shake_divisor;
                log::debug!("Hard landing at speed {:.2}", guy.speed_y);
                outcome.landing_shake = Some(intensity);
            }
            guy.speed_y = 0.0;
            dy = 0;
        } else {
            dy -= 1;
        }
    }
    guy.bounds.translate(0, dy);

    outcome
}
