//! One level's worth of simulation state and the per-tick update order.

use glam::DVec2;

use crate::actor::{Actor, Creature};
use crate::bat::Bat;
use crate::camera::Camera;
use crate::character::Character;
use crate::jumpkin::Jumpkin;
use crate::level::{Level, Spawns};
use crate::motion::{step_character, CharacterInput};
use crate::tuning::Tuning;

/// Held keys for one tick. Edges are derived by the world itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub jumped: bool,
    pub shake_started: bool,
}

pub struct World {
    level: Level,
    tuning: Tuning,
    pub character: Character,
    pub creatures: Vec<Creature>,
    pub camera: Camera,
    was_up: bool,
    tick_count: u64,
}

impl World {
    pub fn new(level: Level, tuning: Tuning) -> Result<Self, String> {
        check_tile_size(&level, &tuning)?;
        let start = level
            .spawns
            .player
            .ok_or_else(|| "Level has no player start".to_string())?;
        let character = Character::spawn(start, level.tile_size);
        let creatures = spawn_creatures(&level.spawns, &tuning);
        let camera = Camera::new(center_of(&character));
        log::info!(
            "World ready: player at ({}, {}), {} creatures",
            character.bounds.x,
            character.bounds.y,
            creatures.len()
        );

        Ok(Self {
            level,
            tuning,
            character,
            creatures,
            camera,
            was_up: false,
            tick_count: 0,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    #[allow(dead_code)]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Swap in a freshly loaded level between ticks. Actors keep their state.
    pub fn replace_level(&mut self, level: Level) -> Result<(), String> {
        check_tile_size(&level, &self.tuning)?;
        self.level = level;
        Ok(())
    }

    pub fn tick(&mut self, input: TickInput, viewport: (u32, u32)) -> TickReport {
        let tuning = &self.tuning;
        self.camera.update_viewport(
            viewport.0,
            viewport.1,
            tuning.visible_tiles_x * tuning.tile_size,
        );

        let character_input = CharacterInput {
            left: input.left,
            right: input.right,
            up: input.up,
            up_pressed: input.up && !self.was_up,
        };
        let outcome = step_character(&mut self.character, character_input, &self.level, tuning);
        let shake_started = outcome
            .landing_shake
            .is_some_and(|intensity| self.camera.shake(intensity));

        self.camera.follow(center_of(&self.character), tuning.camera_drag);
        self.camera.apply_shake();

        self.character.update();
        for creature in &mut self.creatures {
            creature.update();
        }

        self.was_up = input.up;
        self.tick_count += 1;
        TickReport {
            tick: self.tick_count,
            jumped: outcome.jumped,
            shake_started,
        }
    }

    /// Every actor in draw order: the character, then bats, then jumpkins.
    pub fn actors(&self) -> impl Iterator<Item = &dyn Actor> + '_ {
        std::iter::once(&self.character as &dyn Actor)
            .chain(self.creatures.iter().map(|creature| creature as &dyn Actor))
    }
}

fn check_tile_size(level: &Level, tuning: &Tuning) -> Result<(), String> {
    if level.tile_size != tuning.tile_size {
        return Err(format!(
            "Level tile size {} does not match tuning tile_size {}",
            level.tile_size, tuning.tile_size
        ));
    }
    Ok(())
}

fn center_of(character: &Character) -> DVec2 {
    let (x, y) = character.center();
    DVec2::new(f64::from(x), f64::from(y))
}

fn spawn_creatures(spawns: &Spawns, tuning: &Tuning) -> Vec<Creature> {
    let bats = spawns
        .bats
        .iter()
        .enumerate()
        .map(|(i, &tile)| Creature::Bat(Bat::spawn(i, tile, tuning)));
    let centered = spawns
        .centered_jumpkins
        .iter()
        .map(|&tile| Creature::Jumpkin(Jumpkin::spawn_centered(tile, tuning)));
    let left_aligned = spawns
        .left_aligned_jumpkins
        .iter()
        .map(|&tile| Creature::Jumpkin(Jumpkin::spawn_left_aligned(tile, tuning)));
    bats.chain(centered).chain(left_aligned).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::level::PlayerStart;
    use hop_core::WorldPoint;

    pub(crate) const VIEWPORT: (u32, u32) = (800, 600);

    /// 30x12 grid, floor on row 10 (surface y = 160), one bat and one jumpkin.
    pub(crate) fn test_level() -> Level {
        let mut level = Level::from_tiles(vec![-1; 30 * 12], 30, 16, 16).unwrap();
        for x in 0..30 {
            level.set_tile_at(x, 10, 1);
        }
        level.spawns = Spawns {
            player: Some(PlayerStart {
                stand_tile: WorldPoint::new(5, 10),
                facing_left: false,
            }),
            bats: vec![WorldPoint::new(10, 3)],
            centered_jumpkins: vec![WorldPoint::new(15, 9)],
            left_aligned_jumpkins: Vec::new(),
        };
        level
    }

    pub(crate) fn test_world() -> World {
        World::new(test_level(), Tuning::default()).expect("test level is valid")
    }

    const IDLE: TickInput = TickInput {
        left: false,
        right: false,
        up: false,
    };
    const UP: TickInput = TickInput {
        left: false,
        right: false,
        up: true,
    };

    #[test]
    fn new_spawns_actors_and_focuses_on_character() {
        let world = test_world();
        assert_eq!(world.camera.focus, DVec2::new(5.0 * 16.0 + 8.0, 160.0 - 48.0 + 2.0 + 24.0));
        assert_eq!(world.creatures.len(), 2);
        assert!(matches!(world.creatures[0], Creature::Bat(_)));
        assert!(matches!(world.creatures[1], Creature::Jumpkin(_)));

        let sprites: Vec<String> = world.actors().map(|actor| actor.sprite_id()).collect();
        assert_eq!(sprites, vec!["jump3.png", "bat0.png", "jumpkin0.png"]);
    }

    #[test]
    fn new_rejects_level_without_player() {
        let mut level = test_level();
        level.spawns.player = None;
        let err = World::new(level, Tuning::default()).err().expect("no player start");
        assert!(err.contains("no player start"));
    }

    #[test]
    fn new_rejects_mismatched_tile_size() {
        let tuning = Tuning {
            tile_size: 32,
            ..Tuning::default()
        };
        let err = World::new(test_level(), tuning).err().expect("tile size mismatch");
        assert!(err.contains("tile_size 32"));
    }

    #[test]
    fn zoom_follows_viewport_each_tick() {
        let mut world = test_world();
        world.tick(IDLE, (1920, 1080));
        assert_eq!(world.camera.scale, 4);
        world.tick(IDLE, (300, 200));
        assert_eq!(world.camera.scale, 1);
        assert_eq!(world.camera.viewport, (300, 200));
    }

    #[test]
    fn holding_up_jumps_once_until_released() {
        let mut world = test_world();
        for _ in 0..10 {
            world.tick(IDLE, VIEWPORT);
        }

        let jumps = (0..100).filter(|_| world.tick(UP, VIEWPORT).jumped).count();
        assert_eq!(jumps, 1);
        assert!(world.character.on_ground, "landed while still holding up");

        world.tick(IDLE, VIEWPORT);
        assert!(world.tick(UP, VIEWPORT).jumped, "fresh press jumps again");
    }

    #[test]
    fn camera_follows_the_updated_character() {
        let mut world = test_world();
        let before = world.camera.focus;
        world.tick(
            TickInput {
                right: true,
                ..IDLE
            },
            VIEWPORT,
        );
        let expected = center_of(&world.character) * 0.15 + before * 0.85;
        assert!((world.camera.focus - expected).length() < 1e-9);
        assert!(world.camera.focus.x > before.x);
    }

    #[test]
    fn hard_landing_shakes_for_eight_ticks() {
        let mut world = test_world();
        world.character.bounds.translate(0, -200);

        let mut landed = None;
        for _ in 0..120 {
            let report = world.tick(IDLE, VIEWPORT);
            if report.shake_started {
                landed = Some(report.tick);
                break;
            }
        }
        assert!(landed.is_some(), "a 200 pixel drop should shake the screen");
        assert_eq!(world.camera.pending_shake(), 7);
        for _ in 0..7 {
            world.tick(IDLE, VIEWPORT);
        }
        assert_eq!(world.camera.pending_shake(), 0);
    }

    #[test]
    fn creatures_advance_every_tick() {
        let mut world = test_world();
        for _ in 0..3 {
            world.tick(IDLE, VIEWPORT);
        }
        match &world.creatures[0] {
            Creature::Bat(bat) => assert_eq!(bat.angle, 6),
            other => panic!("expected a bat, got {other:?}"),
        }
        assert_eq!(world.tick_count(), 3);
    }

    #[test]
    fn replacing_the_level_keeps_actors() {
        let mut world = test_world();
        for _ in 0..5 {
            world.tick(IDLE, VIEWPORT);
        }
        let character = world.character.clone();

        let mut level = test_level();
        level.set_tile_at(0, 0, 3);
        level.spawns.bats.clear();
        world.replace_level(level).expect("same tile size");

        assert_eq!(world.level().tile_at(0, 0), Some(3));
        assert_eq!(world.creatures.len(), 2);
        assert_eq!(world.character, character);
    }

    #[test]
    fn replacing_with_a_different_tile_size_is_refused() {
        let mut world = test_world();
        let level = Level::from_tiles(vec![0; 4], 2, 8, 32).unwrap();
        assert!(world.replace_level(level).is_err());
        assert_eq!(world.level().tile_size, 16);
    }
}
