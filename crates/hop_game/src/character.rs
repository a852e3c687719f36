use hop_core::WorldRect;

use crate::level::PlayerStart;

/// Sprite frames are 48x48 pixels, three tiles square.
pub const SPRITE_SIZE: i32 = 48;

const STAND_FRAMES: usize = 3;
const STAND_PERIOD: u32 = 15;
const RUN_FRAMES: usize = 8;
const RUN_PERIOD: u32 = 5;
const RUN_NEUTRAL_FRAME: usize = 6;

/// The player. Physics fields are driven by `motion::step_character`; the
/// animation counters only by `update`.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub bounds: WorldRect,
    pub facing_left: bool,
    pub speed_x: i32,
    pub speed_y: f64,
    pub on_ground: bool,
    /// Ticks since the last jump; gravity is suspended while up is held and
    /// this is within the hold window.
    pub jump_since: u32,
    stand_frame: usize,
    stand_timer: u32,
    run_frame: usize,
    run_timer: u32,
}

impl Character {
    pub fn new(bounds: WorldRect, facing_left: bool) -> Self {
        Self {
            bounds,
            facing_left,
            speed_x: 0,
            speed_y: 0.0,
            on_ground: false,
            jump_since: 0,
            stand_frame: 0,
            stand_timer: 0,
            run_frame: 0,
            run_timer: 0,
        }
    }

    /// Centre the character on the start tile with the collider one pixel
    /// above its surface.
    pub fn spawn(start: PlayerStart, tile_size: i32) -> Self {
        let x = tile_size * start.stand_tile.x + tile_size / 2 - SPRITE_SIZE / 2;
        let y = tile_size * start.stand_tile.y - SPRITE_SIZE + 2;
        Self::new(
            WorldRect::new(x, y, SPRITE_SIZE, SPRITE_SIZE),
            start.facing_left,
        )
    }

    /// Probe point near the feet, horizontally centred.
    pub fn collider(&self) -> (i32, i32) {
        (
            self.bounds.x.saturating_add(self.bounds.width / 2),
            self.bounds.y.saturating_add(self.bounds.height - 3),
        )
    }

    pub fn center(&self) -> (i32, i32) {
        self.bounds.center()
    }

    pub fn update(&mut self) {
        self.stand_timer += 1;
        if self.stand_timer >= STAND_PERIOD {
            self.stand_timer = 0;
            self.stand_frame = (self.stand_frame + 1) % STAND_FRAMES;
        }

        self.run_timer += 1;
        if self.run_timer >= RUN_PERIOD {
            self.run_timer = 0;
            self.run_frame = (self.run_frame + 1) % RUN_FRAMES;
        }

        if self.speed_x == 0 {
            self.run_frame = RUN_NEUTRAL_FRAME;
            self.run_timer = 0;
        }

        self.jump_since = self.jump_since.saturating_add(1);
    }

    pub fn sprite_id(&self) -> String {
        if self.on_ground && self.speed_x == 0 {
            return format!("stand{}.png", self.stand_frame);
        }
        if !self.on_ground && self.speed_y >= 0.0 {
            return "jump3.png".to_string();
        }
        if !self.on_ground {
            return "jump2.png".to_string();
        }
        format!("run{}.png", self.run_frame)
    }

    /// Facing left mirrors the frame through a negative source width.
    pub fn source_rect(&self) -> WorldRect {
        if self.facing_left {
            WorldRect::new(self.bounds.width, 0, -self.bounds.width, self.bounds.height)
        } else {
            WorldRect::new(0, 0, self.bounds.width, self.bounds.height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hop_core::WorldPoint;

    fn standing() -> Character {
        let mut guy = Character::new(WorldRect::new(0, 0, 48, 48), false);
        guy.on_ground = true;
        guy
    }

    #[test]
    fn spawn_centres_on_stand_tile() {
        let guy = Character::spawn(
            PlayerStart {
                stand_tile: WorldPoint::new(3, 5),
                facing_left: true,
            },
            16,
        );
        assert_eq!(guy.bounds, WorldRect::new(32, 34, 48, 48));
        assert!(guy.facing_left);
        // Stand tile top is y = 80.
        assert_eq!(guy.collider(), (56, 79));
    }

    #[test]
    fn idle_frames_cycle_every_fifteen_ticks() {
        let mut guy = standing();
        assert_eq!(guy.sprite_id(), "stand0.png");
        for _ in 0..14 {
            guy.update();
        }
        assert_eq!(guy.sprite_id(), "stand0.png");
        guy.update();
        assert_eq!(guy.sprite_id(), "stand1.png");
        for _ in 0..30 {
            guy.update();
        }
        assert_eq!(guy.sprite_id(), "stand0.png");
    }

    #[test]
    fn run_cycle_resets_to_neutral_when_stopped() {
        let mut guy = standing();
        guy.speed_x = 2;
        guy.update();
        assert_eq!(guy.sprite_id(), "run0.png");
        for _ in 0..5 {
            guy.update();
        }
        assert_eq!(guy.sprite_id(), "run1.png");

        guy.speed_x = 0;
        guy.update();
        guy.speed_x = 1;
        assert_eq!(guy.sprite_id(), "run6.png");
        for _ in 0..5 {
            guy.update();
        }
        assert_eq!(guy.sprite_id(), "run7.png");
    }

    #[test]
    fn airborne_sprites_follow_vertical_direction() {
        let mut guy = standing();
        guy.on_ground = false;
        guy.speed_y = -1.0;
        assert_eq!(guy.sprite_id(), "jump2.png");
        guy.speed_y = 0.0;
        assert_eq!(guy.sprite_id(), "jump3.png");
        guy.speed_y = 3.0;
        guy.speed_x = 2;
        assert_eq!(guy.sprite_id(), "jump3.png");
    }

    #[test]
    fn facing_left_flips_source_width() {
        let mut guy = standing();
        assert_eq!(guy.source_rect(), WorldRect::new(0, 0, 48, 48));
        guy.facing_left = true;
        assert_eq!(guy.source_rect(), WorldRect::new(48, 0, -48, 48));
    }
}
