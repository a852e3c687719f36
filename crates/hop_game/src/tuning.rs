//! Gameplay constants, optionally overridden by `config/tuning.json`.
//!
//! Every field has a default, so a partial JSON file only overrides what it
//! names. Speeds are pixels per tick, accelerations pixels per tick².

use serde::Deserialize;

use crate::assets::AssetSource;

pub const TUNING_PATH: &str = "config/tuning.json";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub tile_size: i32,
    /// How many tiles fit across the window before the zoom steps up.
    pub visible_tiles_x: i32,
    pub max_x_speed: i32,
    pub jump_speed: f64,
    /// Ticks after a jump during which holding up suspends gravity.
    pub jump_hold_ticks: u32,
    pub gravity: f64,
    /// Landing at or above this fall speed shakes the screen.
    pub hard_landing_speed: f64,
    pub shake_divisor: f64,
    pub camera_drag: f64,
    pub bat_radius: i32,
    /// Degrees per tick.
    pub bat_speed: i32,
    pub jumpkin_gravity: f64,
    pub jumpkin_launch_speed: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_size: 16,
            visible_tiles_x: 25,
            max_x_speed: 2,
            jump_speed: -2.5,
            jump_hold_ticks: 10,
            gravity: 0.18,
            hard_landing_speed: 5.0,
            shake_divisor: 10.0,
            camera_drag: 0.15,
            bat_radius: 3 * 16,
            bat_speed: 2,
            jumpkin_gravity: 0.13,
            jumpkin_launch_speed: -4.7,
        }
    }
}

impl Tuning {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let tuning: Tuning =
            serde_json::from_str(raw).map_err(|e| format!("Failed to parse tuning JSON: {e}"))?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), String> {
        if self.tile_size <= 0 {
            return Err("Tuning validation failed: tile_size must be > 0".to_string());
        }
        if self.visible_tiles_x <= 0 {
            return Err("Tuning validation failed: visible_tiles_x must be > 0".to_string());
        }
        if self.max_x_speed < 0 {
            return Err("Tuning validation failed: max_x_speed must be >= 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.camera_drag) {
            return Err("Tuning validation failed: camera_drag must be within [0, 1]".to_string());
        }
        if self.shake_divisor <= 0.0 {
            return Err("Tuning validation failed: shake_divisor must be > 0".to_string());
        }
        Ok(())
    }
}

/// Tuning from `TUNING_PATH`, or the defaults when the file does not exist.
pub fn load_tuning(assets: &dyn AssetSource) -> Result<Tuning, String> {
    if assets.modified(TUNING_PATH).is_none() {
        log::info!("No {TUNING_PATH}, using default tuning");
        return Ok(Tuning::default());
    }
    let raw = assets.read_to_string(TUNING_PATH)?;
    Tuning::from_json(&raw).map_err(|e| format!("{TUNING_PATH}: {e}"))
}
