use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Ludum Dare 51 - Every 10 Seconds".to_string(),
            width: 800,
            height: 600,
            fullscreen: true,
        }
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    set_fullscreen(&window, config.fullscreen);
    Arc::new(window)
}

/// Borderless fullscreen on the current monitor; the cursor is hidden while
/// fullscreen.
pub fn set_fullscreen(window: &Window, fullscreen: bool) {
    if fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        window.set_fullscreen(None);
    }
    window.set_cursor_visible(!fullscreen);
    log::info!("Fullscreen: {}", if fullscreen { "ON" } else { "OFF" });
}
