//! Asset access as an explicit capability.
//!
//! Everything that needs file content (level loader, tuning, textures, the
//! hot-reload watcher) is handed an `AssetSource` instead of reaching for a
//! process-wide table. Paths are relative, `/`-separated asset ids such as
//! `world.tmx` or `stand0.png`.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

pub trait AssetSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, String>;

    /// Last modification time, or `None` when the asset cannot be stat'ed.
    fn modified(&self, path: &str) -> Option<SystemTime>;

    fn read_to_string(&self, path: &str) -> Result<String, String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| format!("Asset {path} is not valid UTF-8: {e}"))
    }
}

/// Assets stored below a directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl AssetSource for DirAssets {
    fn read(&self, path: &str) -> Result<Vec<u8>, String> {
        let full = self.resolve(path);
        fs::read(&full).map_err(|e| format!("Failed to read {}: {e}", full.display()))
    }

    fn modified(&self, path: &str) -> Option<SystemTime> {
        fs::metadata(self.resolve(path)).ok()?.modified().ok()
    }
}

#[cfg(test)]
pub mod testing {
    use super::AssetSource;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    /// In-memory assets with a manually advanced modification clock.
    #[derive(Default)]
    pub struct MemoryAssets {
        files: RefCell<HashMap<String, (Vec<u8>, SystemTime)>>,
        clock: RefCell<u64>,
    }

    impl MemoryAssets {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, path: &str, content: impl Into<Vec<u8>>) {
            let mut clock = self.clock.borrow_mut();
            *clock += 1;
            let stamp = UNIX_EPOCH + Duration::from_secs(*clock);
            self.files
                .borrow_mut()
                .insert(path.to_string(), (content.into(), stamp));
        }

        pub fn remove(&self, path: &str) {
            self.files.borrow_mut().remove(path);
        }
    }

    impl AssetSource for MemoryAssets {
        fn read(&self, path: &str) -> Result<Vec<u8>, String> {
            self.files
                .borrow()
                .get(path)
                .map(|(bytes, _)| bytes.clone())
                .ok_or_else(|| format!("Failed to read {path}: not found"))
        }

        fn modified(&self, path: &str) -> Option<SystemTime> {
            self.files.borrow().get(path).map(|(_, stamp)| *stamp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn temp_dir(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "hop_assets_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn dir_assets_reads_relative_paths() {
        let root = temp_dir("read");
        fs::create_dir_all(root.join("config")).expect("create temp dir");
        fs::write(root.join("config/tuning.json"), "{}").expect("write temp file");

        let assets = DirAssets::new(&root);
        assert_eq!(assets.read_to_string("config/tuning.json").unwrap(), "{}");
        assert!(assets.modified("config/tuning.json").is_some());

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn dir_assets_reports_missing_files() {
        let assets = DirAssets::new(temp_dir("missing"));
        let err = assets.read("nope.png").expect_err("missing file should fail");
        assert!(err.contains("nope.png"));
        assert!(assets.modified("nope.png").is_none());
    }
}
