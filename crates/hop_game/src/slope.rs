//! Sub-tile collision silhouettes.
//!
//! Every tile id of the base atlas maps to one `SlopeShape`. A shape is a
//! one-pixel-thick walkable line inside the tile, described in tile-local
//! pixel coordinates (`rel_x`, `rel_y` in `0..tile_size`, Y down). Actors only
//! ever probe single points against these lines, so the exact pixel set of
//! each shape *is* the feel of every ramp in the game.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlopeShape {
    None,
    /// Flat surface along the tile's top row.
    Top,
    /// 45° line from the top-left to the bottom-right corner.
    Diagonal45Down,
    /// 45° line from the bottom-left to the top-right corner.
    Diagonal45Up,
    /// Half-steep descent through the upper half of the tile.
    QuarterDownFromTop,
    /// Half-steep descent through the lower half of the tile.
    QuarterDownFromCenter,
    /// Half-steep ascent through the upper half (mirror of `QuarterDownFromTop`).
    QuarterUpFromCenter,
    /// Half-steep ascent through the lower half (mirror of `QuarterDownFromCenter`).
    QuarterUpFromBottom,
}

use SlopeShape::{
    Diagonal45Down as D45, Diagonal45Up as U45, None as N, QuarterDownFromCenter as QDC,
    QuarterDownFromTop as QDT, QuarterUpFromBottom as QUB, QuarterUpFromCenter as QUC, Top as T,
};

/// Shapes of the base atlas, 16 tiles per row. Ids past the end never collide.
#[rustfmt::skip]
pub const SLOPE_CATALOG: [SlopeShape; 128] = [
    T, T, T, T, N, N, D45, U45, N, N, N, N, N, N, N, N,
    N, N, N, N, N, N, N, N, N, N, N, N, N, N, N, N,
    N, N, N, N, QDT, QDC, QUB, QUC, N, N, N, N, N, N, N, N,
    T, T, T, T, N, N, N, N, N, N, N, N, N, N, N, N,
    N, N, N, T, N, N, N, N, N, N, N, N, N, N, N, N,
    N, N, N, N, N, N, N, N, N, N, N, N, N, N, N, N,
    T, T, T, N, N, N, N, N, N, N, N, N, N, N, N, N,
    N, N, N, N, N, N, N, N, N, N, N, N, N, N, N, N,
];

/// Shape for a tile id; empty cells (`< 0`) and ids outside the catalog have none.
pub fn shape_for_tile(tile: i32) -> SlopeShape {
    usize::try_from(tile)
        .ok()
        .and_then(|index| SLOPE_CATALOG.get(index))
        .copied()
        .unwrap_or(SlopeShape::None)
}

/// Whether tile-local pixel (`rel_x`, `rel_y`) lies on the walkable line of `shape`.
pub fn is_surface_at(shape: SlopeShape, rel_x: i32, rel_y: i32, tile_size: i32) -> bool {
    let half = tile_size / 2;
    let mirrored_x = tile_size - 1 - rel_x;
    match shape {
        SlopeShape::Top => rel_y == 0,
        SlopeShape::Diagonal45Down => rel_x == rel_y,
        SlopeShape::Diagonal45Up => rel_x == tile_size - 1 - rel_y,
        SlopeShape::QuarterDownFromTop => on_double_step(rel_x, rel_y),
        SlopeShape::QuarterDownFromCenter => on_double_step(rel_x, rel_y - half),
        SlopeShape::QuarterUpFromBottom => on_double_step(mirrored_x, rel_y - half),
        SlopeShape::QuarterUpFromCenter => on_double_step(mirrored_x, rel_y),
        SlopeShape::None => false,
    }
}

/// Two pixels across per pixel down.
fn on_double_step(x: i32, row: i32) -> bool {
    let y = row * 2;
    x == y || x == y + 1
}
