use hop_core::{ScreenRect, WorldRect};

use crate::world::World;

/// Blit part of `image` into `dest`. A negative source width mirrors the
/// image horizontally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCommand {
    pub image: String,
    pub source: WorldRect,
    pub dest: ScreenRect,
}

/// Everything visible this frame in painter's order: tiles row by row, then
/// the character, bats and jumpkins.
pub fn build_draw_list(world: &World) -> Vec<DrawCommand> {
    let level = world.level();
    let camera = &world.camera;
    let size = level.tile_size;

    let tiles = level.tiles().filter_map(|(x, y, tile)| {
        Some(DrawCommand {
            image: level.tile_image.clone(),
            source: level.tile_atlas_rect(tile)?,
            dest: camera.world_to_screen_rect(WorldRect::new(x * size, y * size, size, size)),
        })
    });
    let actors = world.actors().map(|actor| DrawCommand {
        image: actor.sprite_id(),
        source: actor.source_rect(),
        dest: camera.world_to_screen_rect(actor.bounds()),
    });
    tiles.chain(actors).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tests::{test_world, VIEWPORT};
    use crate::world::TickInput;

    #[test]
    fn tiles_come_first_then_actors() {
        let world = test_world();
        let list = build_draw_list(&world);
        assert_eq!(list.len(), 30 + 3);
        assert!(list[..30].iter().all(|cmd| cmd.image == "base.png"));
        let images: Vec<&str> = list[30..].iter().map(|cmd| cmd.image.as_str()).collect();
        assert_eq!(images, vec!["jump3.png", "bat0.png", "jumpkin0.png"]);
    }

    #[test]
    fn tile_commands_use_atlas_rect_and_camera() {
        let mut world = test_world();
        world.tick(TickInput::default(), VIEWPORT);
        let list = build_draw_list(&world);

        let first = &list[0];
        assert_eq!(first.source, WorldRect::new(16, 0, 16, 16));
        assert_eq!(
            first.dest,
            world.camera.world_to_screen_rect(WorldRect::new(0, 160, 16, 16))
        );
        assert_eq!(first.dest.width, 32, "800 pixels wide zooms to 2x");
    }

    #[test]
    fn character_falling_past_the_world_edge_still_draws() {
        let mut world = test_world();
        // Off the left of the grid, a long way into an endless fall.
        world.character.bounds = WorldRect::new(-200, i32::MAX - 5_000, 48, 48);
        world.character.speed_y = 1_000.0;

        for _ in 0..20 {
            world.tick(TickInput::default(), (1920, 1080));
            assert_eq!(build_draw_list(&world).len(), 30 + 3);
        }

        assert_eq!(world.character.bounds.y, i32::MAX);
        assert!(!world.character.on_ground);
        let list = build_draw_list(&world);
        let character = &list[30];
        // The camera lags behind the fall, so the character is below the window.
        assert!(character.dest.y > 1080);
        assert_eq!((character.dest.width, character.dest.height), (192, 192));
    }

    #[test]
    fn left_facing_character_is_mirrored() {
        let mut world = test_world();
        world.character.facing_left = true;
        let list = build_draw_list(&world);
        let character = &list[30];
        assert_eq!(character.source, WorldRect::new(48, 0, -48, 48));
        assert_eq!(
            character.dest,
            world.camera.world_to_screen_rect(world.character.bounds)
        );
    }
}
