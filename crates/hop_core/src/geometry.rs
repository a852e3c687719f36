//! Integer pixel geometry shared by simulation and rendering.
//!
//! World coordinates start top-left at (0, 0), X grows right and Y grows down.
//! They are unscaled pixels: one tile is `tile_size` units square and actors
//! move in whole units on this grid. Screen coordinates are the same layout
//! after camera pan and integer zoom.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WorldPoint {
    pub x: i32,
    pub y: i32,
}

impl WorldPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in world pixels. A negative width is legal for
/// source rectangles and means "mirror horizontally".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WorldRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WorldRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Saturates at the `i32` range.
    pub fn center(&self) -> (i32, i32) {
        (
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    /// Saturates at the `i32` range, so an actor that falls forever parks at
    /// the edge of the world instead of wrapping around.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }
}

/// Rectangle in window pixels, produced by the camera transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Round half away from zero: -2.5 becomes -3 and 2.5 becomes 3.
pub fn round(x: f64) -> i32 {
    if x < 0.0 {
        (x - 0.5) as i32
    } else {
        (x + 0.5) as i32
    }
}
