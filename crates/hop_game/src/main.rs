//! Hop -- a small tile platformer.
//!
//! winit drives the event loop via `ApplicationHandler`. Every redraw runs at
//! most one fixed 60 Hz tick (see `TimeState`) and then draws the world:
//!
//!   1. Escape, level hot reload and fullscreen toggle
//!   2. `World::tick` with the held arrow keys and the current window size
//!   3. `build_draw_list` -> `SpriteBatch` -> `SpriteRenderer::render`
//!
//! Assets are read from a directory (first CLI argument, default `assets`).
//! Any failure to load the level, the tuning or a sprite image is fatal.

mod actor;
mod assets;
mod bat;
mod camera;
mod character;
mod draw_list;
mod jumpkin;
mod level;
mod motion;
#[cfg(test)]
mod replay;
mod slope;
mod tmx;
mod tuning;
mod world;

use std::path::PathBuf;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{AssetSource, DirAssets};
use draw_list::build_draw_list;
use hop_core::{InputState, Key, TimeState};
use hop_platform::{create_window, set_fullscreen, PlatformConfig};
use hop_render::{SpriteBatch, SpriteQuad, SpriteRenderer};
use level::{load_level, LevelWatcher, LEVEL_PATH};
use tuning::load_tuning;
use world::{TickInput, World};

const DEFAULT_ASSET_ROOT: &str = "assets";

struct GameConfig {
    asset_root: PathBuf,
    level_path: String,
    clear_color: wgpu::Color,
}

impl GameConfig {
    fn from_args() -> Self {
        let asset_root = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_ROOT));
        Self {
            asset_root,
            level_path: LEVEL_PATH.to_string(),
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.7,
                b: 1.0,
                a: 1.0,
            },
        }
    }
}

/// Everything that lives as long as the window. Constructed in
/// `ApplicationHandler::resumed` once a surface is available.
struct EngineState {
    window: Arc<Window>,
    renderer: SpriteRenderer,
    time: TimeState,
    input: InputState,
    assets: DirAssets,
    level_watcher: LevelWatcher,
    world: World,
    batch: SpriteBatch,
    fullscreen: bool,
    clear_color: wgpu::Color,
}

impl EngineState {
    fn new(window: Arc<Window>, config: &GameConfig, fullscreen: bool) -> Self {
        let assets = DirAssets::new(&config.asset_root);
        log::info!("Reading assets from {}", config.asset_root.display());

        let tuning = load_tuning(&assets).unwrap_or_else(|err| {
            panic!("Failed to load tuning: {err}");
        });
        let level = load_level(&assets, &config.level_path).unwrap_or_else(|err| {
            panic!("{err}");
        });
        let level_watcher = LevelWatcher::new(&assets, &config.level_path);
        if !level_watcher.is_armed() {
            log::info!("Level hot reload disabled: cannot stat {}", config.level_path);
        }
        let world = World::new(level, tuning).unwrap_or_else(|err| {
            panic!("Failed to start level '{}': {}", config.level_path, err);
        });

        let renderer = SpriteRenderer::new(window.clone()).unwrap_or_else(|err| {
            panic!("Failed to initialise rendering: {err}");
        });

        Self {
            renderer,
            window,
            time: TimeState::new(),
            input: InputState::new(),
            assets,
            level_watcher,
            world,
            batch: SpriteBatch::new(),
            fullscreen,
            clear_color: config.clear_color,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.time.begin_frame();
        while self.time.should_step() {
            if self.input.is_just_pressed(Key::Escape) {
                log::info!("Escape pressed, exiting.");
                event_loop.exit();
                return;
            }

            if let Some(level) = self.level_watcher.poll(&self.assets) {
                match self.world.replace_level(level) {
                    Ok(()) => self.renderer.evict_textures(),
                    Err(err) => log::error!("Level reload rejected: {err}"),
                }
            }

            if self.input.fullscreen_toggled() {
                self.fullscreen = !self.fullscreen;
                set_fullscreen(&self.window, self.fullscreen);
            }

            let input = TickInput {
                left: self.input.is_held(Key::Left),
                right: self.input.is_held(Key::Right),
                up: self.input.is_held(Key::Up),
            };
            let report = self.world.tick(input, self.renderer.viewport());
            if report.jumped {
                log::trace!("Jump at tick {}", report.tick);
            }
            self.input.end_frame();
        }

        self.draw();
    }

    fn draw(&mut self) {
        let commands = build_draw_list(&self.world);
        self.batch.clear();
        for command in &commands {
            let assets = &self.assets;
            let texture_size = self
                .renderer
                .ensure_texture(&command.image, || assets.read(&command.image))
                .unwrap_or_else(|err| {
                    log::error!("Cannot draw '{}': {}", command.image, err);
                    panic!("Missing frame asset '{}': {}", command.image, err);
                });
            self.batch.push_quad(SpriteQuad {
                texture_key: &command.image,
                texture_size,
                source: [
                    command.source.x,
                    command.source.y,
                    command.source.width,
                    command.source.height,
                ],
                dest: [
                    command.dest.x,
                    command.dest.y,
                    command.dest.width,
                    command.dest.height,
                ],
            });
        }
        self.renderer.render(&self.batch, self.clear_color);
    }
}

struct App {
    platform: PlatformConfig,
    game: GameConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            platform: PlatformConfig::default(),
            game: GameConfig::from_args(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = create_window(event_loop, &self.platform);
        log::info!(
            "Window created: {}x{}",
            self.platform.width,
            self.platform.height
        );
        self.state = Some(EngineState::new(
            window,
            &self.game,
            self.platform.fullscreen,
        ));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.renderer.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => state.input.release_all(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(key),
                            ElementState::Released => state.input.key_up(key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let (w, h) = state.renderer.viewport();
                if w == 0 || h == 0 {
                    return;
                }
                state.redraw(event_loop);
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::NumpadEnter => Some(Key::NumEnter),
        KeyCode::F11 => Some(Key::F11),
        KeyCode::AltLeft => Some(Key::LeftAlt),
        KeyCode::AltRight => Some(Key::RightAlt),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Hop starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
