use hop_core::{round, WorldPoint, WorldRect};

use crate::actor::Actor;
use crate::character::SPRITE_SIZE;
use crate::tuning::Tuning;

const FRAMES: usize = 4;
const FRAME_PERIOD: u32 = 9;

/// Flies a circle around a fixed centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Bat {
    pub center: WorldPoint,
    /// Degrees, `0..360`.
    pub angle: i32,
    radius: i32,
    speed: i32,
    frame: usize,
    frame_timer: u32,
}

impl Bat {
    /// The `index`-th bat of the level. Indices stagger the wing animation so
    /// flocks do not flap in sync.
    pub fn spawn(index: usize, tile: WorldPoint, tuning: &Tuning) -> Self {
        let tile_size = tuning.tile_size;
        Self {
            center: WorldPoint::new(
                tile.x * tile_size,
                tile.y * tile_size + tile_size - tuning.bat_radius - SPRITE_SIZE / 2,
            ),
            angle: 0,
            radius: tuning.bat_radius,
            speed: tuning.bat_speed,
            frame: index % FRAMES,
            frame_timer: 3 * index as u32,
        }
    }
}

impl Actor for Bat {
    fn bounds(&self) -> WorldRect {
        let (sin, cos) = f64::from(self.angle).to_radians().sin_cos();
        let radius = f64::from(self.radius);
        WorldRect::new(
            self.center.x + round(cos * radius) - SPRITE_SIZE / 2,
            self.center.y + round(sin * radius) - SPRITE_SIZE / 2,
            SPRITE_SIZE,
            SPRITE_SIZE,
        )
    }

    fn sprite_id(&self) -> String {
        format!("bat{}.png", self.frame)
    }

    fn source_rect(&self) -> WorldRect {
        WorldRect::new(0, 0, SPRITE_SIZE, SPRITE_SIZE)
    }

    fn update(&mut self) {
        self.angle = (self.angle + self.speed).rem_euclid(360);

        self.frame_timer += 1;
        if self.frame_timer >= FRAME_PERIOD {
            self.frame_timer = 0;
            self.frame = (self.frame + 1) % FRAMES;
        }
    }
}
