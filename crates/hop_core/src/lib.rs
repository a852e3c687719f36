pub mod geometry;
pub mod input;
pub mod time;

pub use geometry::{round, ScreenRect, WorldPoint, WorldRect};
pub use input::{InputState, Key};
pub use time::TimeState;
