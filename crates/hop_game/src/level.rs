//! Level grid: the tile array, atlas metrics, downward collision and the
//! actor spawn points found in the map's `objects` layer.
//!
//! Tiles are stored row-major as 0-based atlas ids with `-1` for empty cells.
//! Collision is a property of the tile id alone (see `slope`), so the grid
//! needs no separate collision layer.

use std::time::SystemTime;

use hop_core::{WorldPoint, WorldRect};

use crate::assets::AssetSource;
use crate::slope::{is_surface_at, shape_for_tile};
use crate::tmx::{parse_csv_tiles, TiledMap};

pub const LEVEL_PATH: &str = "world.tmx";
const BASE_LAYER: &str = "base";
const OBJECTS_LAYER: &str = "objects";
const DEFAULT_ATLAS_IMAGE: &str = "base.png";
const DEFAULT_ATLAS_WIDTH: i32 = 256;

// Reserved ids in the objects layer (0-based).
pub const PLAYER_RIGHT_TILE: i32 = 272;
pub const PLAYER_LEFT_TILE: i32 = 273;
pub const BAT_TILE: i32 = 274;
pub const JUMPKIN_CENTERED_TILE: i32 = 275;
pub const JUMPKIN_LEFT_ALIGNED_TILE: i32 = 276;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Player { facing_left: bool },
    Bat,
    JumpkinCentered,
    JumpkinLeftAligned,
}

impl SpawnKind {
    pub fn from_object_tile(tile: i32) -> Option<Self> {
        match tile {
            PLAYER_RIGHT_TILE => Some(Self::Player { facing_left: false }),
            PLAYER_LEFT_TILE => Some(Self::Player { facing_left: true }),
            BAT_TILE => Some(Self::Bat),
            JUMPKIN_CENTERED_TILE => Some(Self::JumpkinCentered),
            JUMPKIN_LEFT_ALIGNED_TILE => Some(Self::JumpkinLeftAligned),
            _ => None,
        }
    }
}

/// The tile the character stands on when the level starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStart {
    pub stand_tile: WorldPoint,
    pub facing_left: bool,
}

/// Spawn cells in tile coordinates, in row-major scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spawns {
    pub player: Option<PlayerStart>,
    pub bats: Vec<WorldPoint>,
    pub centered_jumpkins: Vec<WorldPoint>,
    pub left_aligned_jumpkins: Vec<WorldPoint>,
}

impl Spawns {
    pub fn scan(objects: &[i32], width: usize) -> Self {
        let mut spawns = Spawns::default();
        for (index, &tile) in objects.iter().enumerate() {
            let Some(kind) = SpawnKind::from_object_tile(tile) else {
                continue;
            };
            let cell = WorldPoint::new((index % width) as i32, (index / width) as i32);
            match kind {
                SpawnKind::Player { facing_left } => {
                    if spawns.player.is_some() {
                        log::warn!(
                            "Ignoring extra player start at tile ({}, {})",
                            cell.x,
                            cell.y
                        );
                        continue;
                    }
                    spawns.player = Some(PlayerStart {
                        stand_tile: WorldPoint::new(cell.x, cell.y + 1),
                        facing_left,
                    });
                }
                SpawnKind::Bat => spawns.bats.push(cell),
                SpawnKind::JumpkinCentered => spawns.centered_jumpkins.push(cell),
                SpawnKind::JumpkinLeftAligned => spawns.left_aligned_jumpkins.push(cell),
            }
        }
        spawns
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    tiles: Vec<i32>,
    width: usize,
    pub tile_size: i32,
    /// Atlas columns.
    pub tile_count_x: i32,
    pub tile_image: String,
    pub spawns: Spawns,
}

impl Level {
    /// A grid without spawns. `tiles.len()` must be a multiple of `width`.
    pub fn from_tiles(
        tiles: Vec<i32>,
        width: usize,
        tile_size: i32,
        tile_count_x: i32,
    ) -> Result<Self, String> {
        if width == 0 || tiles.len() % width != 0 {
            return Err(format!(
                "Level validation failed: {} tiles do not form rows of {}",
                tiles.len(),
                width
            ));
        }
        if tile_size <= 0 || tile_count_x <= 0 {
            return Err(
                "Level validation failed: tile size and atlas columns must be > 0".to_string(),
            );
        }
        Ok(Self {
            tiles,
            width,
            tile_size,
            tile_count_x,
            tile_image: DEFAULT_ATLAS_IMAGE.to_string(),
            spawns: Spawns::default(),
        })
    }

    /// (columns, rows)
    pub fn size(&self) -> (i32, i32) {
        (self.width as i32, (self.tiles.len() / self.width) as i32)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (width, height) = self.size();
        if x < 0 || y < 0 || x >= width || y >= height {
            return None;
        }
        Some(x as usize + y as usize * self.width)
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<i32> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    /// Returns false (and changes nothing) outside the grid.
    #[allow(dead_code)]
    pub fn set_tile_at(&mut self, x: i32, y: i32, tile: i32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Source rectangle of `tile` inside the atlas image; `None` for empty cells.
    pub fn tile_atlas_rect(&self, tile: i32) -> Option<WorldRect> {
        if tile < 0 {
            return None;
        }
        Some(WorldRect::new(
            self.tile_size * (tile % self.tile_count_x),
            self.tile_size * (tile / self.tile_count_x),
            self.tile_size,
            self.tile_size,
        ))
    }

    /// Whether world pixel (`x`, `y`) lies on a walkable surface. Everything
    /// outside the grid is open air.
    pub fn collides_downward(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let tile_x = x / self.tile_size;
        let tile_y = y / self.tile_size;
        let Some(tile) = self.tile_at(tile_x, tile_y) else {
            return false;
        };
        let rel_x = x - tile_x * self.tile_size;
        let rel_y = y - tile_y * self.tile_size;
        is_surface_at(shape_for_tile(tile), rel_x, rel_y, self.tile_size)
    }

    /// Non-empty cells as (column, row, tile id), row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile >= 0)
            .map(move |(i, &tile)| ((i % width) as i32, (i / width) as i32, tile))
    }
}

/// Read and parse the level at `path`. Any error is fatal for the caller:
/// no partially loaded level is ever returned.
pub fn load_level(assets: &dyn AssetSource, path: &str) -> Result<Level, String> {
    let xml = assets.read_to_string(path)?;
    parse_level(&xml, path).map_err(|e| format!("Failed to load level {path}: {e}"))
}

pub fn parse_level(xml: &str, path: &str) -> Result<Level, String> {
    let map = TiledMap::parse(xml)?;
    let tiles = parse_csv_tiles(map.layer_csv(BASE_LAYER)?)?;
    let objects = parse_csv_tiles(map.layer_csv(OBJECTS_LAYER)?)?;
    if objects.len() != tiles.len() {
        return Err(format!(
            "layer '{OBJECTS_LAYER}' has {} cells, '{BASE_LAYER}' has {}",
            objects.len(),
            tiles.len()
        ));
    }

    let (tile_image, atlas_width) = match &map.tileset_image {
        Some(image) => (
            sibling_asset(path, &image.source),
            image.width.unwrap_or(DEFAULT_ATLAS_WIDTH),
        ),
        None => (sibling_asset(path, DEFAULT_ATLAS_IMAGE), DEFAULT_ATLAS_WIDTH),
    };
    let tile_count_x = atlas_width / map.tile_width;

    let mut level = Level::from_tiles(tiles, map.width, map.tile_width, tile_count_x)?;
    level.tile_image = tile_image;
    level.spawns = Spawns::scan(&objects, map.width);
    if level.spawns.player.is_none() {
        return Err(format!("no player start tile in layer '{OBJECTS_LAYER}'"));
    }

    let (width, height) = level.size();
    log::info!(
        "Level {path}: {width}x{height} tiles, {} bats, {} jumpkins",
        level.spawns.bats.len(),
        level.spawns.centered_jumpkins.len() + level.spawns.left_aligned_jumpkins.len()
    );
    Ok(level)
}

/// Asset id of `source` relative to the directory holding `map_path`.
fn sibling_asset(map_path: &str, source: &str) -> String {
    match map_path.rfind('/') {
        Some(slash) => format!("{}/{}", &map_path[..slash], source),
        None => source.to_string(),
    }
}

/// Polls a level asset's modification time and reloads it when it advances.
///
/// The watcher is only armed when the level could be stat'ed at startup.
/// Stat and read failures are skipped silently (the editor may be mid-save);
/// a level that fails to parse is logged once per change and ignored.
pub struct LevelWatcher {
    path: String,
    last_seen_modified: Option<SystemTime>,
}

impl LevelWatcher {
    pub fn new(assets: &dyn AssetSource, path: &str) -> Self {
        Self {
            path: path.to_string(),
            last_seen_modified: assets.modified(path),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.last_seen_modified.is_some()
    }

    pub fn poll(&mut self, assets: &dyn AssetSource) -> Option<Level> {
        let last = self.last_seen_modified?;
        let now = assets.modified(&self.path)?;
        if now <= last {
            return None;
        }
        let xml = match assets.read_to_string(&self.path) {
            Ok(xml) => xml,
            Err(err) => {
                log::trace!("Level reload skipped: {err}");
                return None;
            }
        };
        self.last_seen_modified = Some(now);
        match parse_level(&xml, &self.path) {
            Ok(level) => {
                log::info!("Level reloaded (file watcher): {}", self.path);
                Some(level)
            }
            Err(err) => {
                log::error!("Level reload failed, keeping previous level: {err}");
                None
            }
        }
    }
}
