use hop_core::{round, WorldPoint, WorldRect};

use crate::actor::Actor;
use crate::character::SPRITE_SIZE;
use crate::tuning::Tuning;

const SETTLE_START: u32 = 6;
const RELAUNCH_PHASE: u32 = 10;
const SETTLE_OFFSET: f64 = -1.0;
/// Above this upward speed the launch frame is shown.
const LAUNCH_SPRITE_SPEED: f64 = -1.5;
const FOOT_SINK: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpkinState {
    Airborne,
    Bouncing,
}

/// Hops in place on a fixed foot anchor: rise, fall back to the anchor,
/// squash for a few ticks and launch again.
#[derive(Debug, Clone, PartialEq)]
pub struct Jumpkin {
    pub foot: WorldPoint,
    /// Vertical offset from the foot anchor, negative is up.
    pub dy: f64,
    pub speed_y: f64,
    pub bounce: u32,
    pub state: JumpkinState,
    gravity: f64,
    launch_speed: f64,
}

impl Jumpkin {
    pub fn new(foot: WorldPoint, tuning: &Tuning) -> Self {
        Self {
            foot,
            dy: 0.0,
            speed_y: 0.0,
            bounce: 0,
            state: JumpkinState::Airborne,
            gravity: tuning.jumpkin_gravity,
            launch_speed: tuning.jumpkin_launch_speed,
        }
    }

    /// Standing on the middle of `tile`'s floor.
    pub fn spawn_centered(tile: WorldPoint, tuning: &Tuning) -> Self {
        let size = tuning.tile_size;
        Self::new(
            WorldPoint::new(tile.x * size + size / 2, (tile.y + 1) * size + FOOT_SINK),
            tuning,
        )
    }

    /// Standing on the boundary between `tile` and its right neighbour.
    pub fn spawn_left_aligned(tile: WorldPoint, tuning: &Tuning) -> Self {
        let size = tuning.tile_size;
        Self::new(
            WorldPoint::new((tile.x + 1) * size, (tile.y + 1) * size + FOOT_SINK),
            tuning,
        )
    }
}

impl Actor for Jumpkin {
    fn bounds(&self) -> WorldRect {
        WorldRect::new(
            self.foot.x - SPRITE_SIZE / 2,
            self.foot.y - SPRITE_SIZE + round(self.dy),
            SPRITE_SIZE,
            SPRITE_SIZE,
        )
    }

    fn sprite_id(&self) -> String {
        let frame = match self.state {
            JumpkinState::Airborne if self.speed_y < LAUNCH_SPRITE_SPEED => 4,
            JumpkinState::Airborne => 0,
            JumpkinState::Bouncing if self.bounce > SETTLE_START => 2,
            JumpkinState::Bouncing => 3,
        };
        format!("jumpkin{frame}.png")
    }

    fn source_rect(&self) -> WorldRect {
        WorldRect::new(0, 0, SPRITE_SIZE, SPRITE_SIZE)
    }

    fn update(&mut self) {
        match self.state {
            JumpkinState::Airborne => {
                self.dy += self.speed_y;
                self.speed_y += self.gravity;
                if self.dy >= 0.0 {
                    self.state = JumpkinState::Bouncing;
                    self.bounce = 0;
                }
            }
            JumpkinState::Bouncing => {
                self.bounce += 1;
                if (SETTLE_START..=RELAUNCH_PHASE).contains(&self.bounce) {
                    self.dy = SETTLE_OFFSET;
                }
                if self.bounce >= RELAUNCH_PHASE {
                    self.speed_y = self.launch_speed;
                    self.dy = 0.0;
                    self.state = JumpkinState::Airborne;
                }
            }
        }
    }
}
