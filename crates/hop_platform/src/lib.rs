pub mod window;

pub use window::{create_window, set_fullscreen, PlatformConfig};
