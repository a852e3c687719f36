//! Scripted input runs for exercising `World::tick` without a window.
//!
//! A replay is JSON: `{ "frames": [ { "right": true, "repeat": 30 }, ... ] }`.
//! Omitted keys are released; `repeat` defaults to one tick.

use serde::Deserialize;

use crate::assets::AssetSource;
use crate::world::{TickInput, TickReport, World};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayStep {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub up: bool,
    #[serde(default = "one_tick")]
    pub repeat: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Replay {
    pub frames: Vec<ReplayStep>,
}

impl Replay {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let replay: Replay =
            serde_json::from_str(raw).map_err(|e| format!("Failed to parse replay JSON: {e}"))?;
        if replay.frames.is_empty() {
            return Err("Replay has no frames".to_string());
        }
        if replay.frames.iter().any(|step| step.repeat == 0) {
            return Err("Replay step with repeat 0".to_string());
        }
        Ok(replay)
    }

    pub fn load(assets: &dyn AssetSource, path: &str) -> Result<Self, String> {
        let raw = assets.read_to_string(path)?;
        Self::parse(&raw).map_err(|e| format!("{path}: {e}"))
    }

    pub fn inputs(&self) -> impl Iterator<Item = TickInput> + '_ {
        self.frames.iter().flat_map(|step| {
            let input = TickInput {
                left: step.left,
                right: step.right,
                up: step.up,
            };
            std::iter::repeat(input).take(step.repeat as usize)
        })
    }

    pub fn run(&self, world: &mut World, viewport: (u32, u32)) -> Vec<TickReport> {
        self.inputs().map(|input| world.tick(input, viewport)).collect()
    }
}

fn one_tick() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testing::MemoryAssets;
    use crate::world::tests::{test_world, VIEWPORT};

    const WALK_AND_HOP: &str = r#"{
      "frames": [
        { "right": true, "repeat": 60 },
        { "right": true, "up": true, "repeat": 20 },
        { "right": true, "repeat": 60 },
        { "left": true, "repeat": 45 },
        { "left": true, "right": true, "repeat": 5 },
        { "up": true, "repeat": 3 },
        { "repeat": 30 }
      ]
    }"#;

    #[test]
    fn steps_expand_to_ticks() {
        let replay = Replay::parse(r#"{ "frames": [ { "right": true, "repeat": 3 }, { "up": true } ] }"#)
            .expect("replay should parse");
        let inputs: Vec<TickInput> = replay.inputs().collect();
        assert_eq!(inputs.len(), 4);
        assert!(inputs[0].right && !inputs[0].left);
        assert!(inputs[3].up && !inputs[3].right);
    }

    #[test]
    fn bad_replays_are_rejected() {
        let err = Replay::parse(r#"{ "frames": [] }"#).expect_err("empty replay");
        assert!(err.contains("no frames"));
        let err = Replay::parse(r#"{ "frames": [ { "repeat": 0 } ] }"#).expect_err("zero repeat");
        assert!(err.contains("repeat 0"));
        let err = Replay::parse(r#"{ "frames": [ { "jump": true } ] }"#).expect_err("unknown key");
        assert!(err.contains("parse"));
    }

    #[test]
    fn load_names_the_replay_on_error() {
        let assets = MemoryAssets::new();
        assets.insert("replays/broken.json", "{");
        let err = Replay::load(&assets, "replays/broken.json").expect_err("truncated JSON");
        assert!(err.starts_with("replays/broken.json"));
        assert!(Replay::load(&assets, "replays/missing.json").is_err());
    }

    #[test]
    fn replay_run_is_deterministic() {
        let assets = MemoryAssets::new();
        assets.insert("replays/walk.json", WALK_AND_HOP);
        let replay = Replay::load(&assets, "replays/walk.json").expect("replay should load");

        let mut run_a = test_world();
        let mut run_b = test_world();
        let reports_a = replay.run(&mut run_a, VIEWPORT);
        let reports_b = replay.run(&mut run_b, VIEWPORT);

        assert_eq!(reports_a.len(), 223);
        assert_eq!(reports_a, reports_b);
        assert_eq!(run_a.character, run_b.character);
        assert_eq!(run_a.camera, run_b.camera);
        assert_eq!(run_a.creatures, run_b.creatures);
        assert_eq!(reports_a.iter().filter(|r| r.jumped).count(), 2);
    }
}
