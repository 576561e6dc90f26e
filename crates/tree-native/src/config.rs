use std::path::PathBuf;

pub const ENV_PHOTO_DIR: &str = "TREE_PHOTO_DIR";
pub const ENV_LANDMARKS: &str = "TREE_LANDMARKS";
pub const ENV_SEED: &str = "TREE_SEED";
pub const ENV_MUSIC: &str = "TREE_MUSIC";

/// Asset locations and capture selection, read once from the environment.
#[derive(Clone, Debug)]
pub struct NativeConfig {
    pub photo_dir: PathBuf,
    pub landmarks: Option<PathBuf>,
    pub music: PathBuf,
    pub seed: u64,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            photo_dir: PathBuf::from("images"),
            landmarks: None,
            music: PathBuf::from("music/bgm.mp3"),
            seed: 42,
        }
    }
}

impl NativeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let seed = match lookup(ENV_SEED) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("[config] ignoring unparsable {ENV_SEED}={raw:?}");
                defaults.seed
            }),
            None => defaults.seed,
        };
        Self {
            photo_dir: lookup(ENV_PHOTO_DIR)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.photo_dir),
            landmarks: lookup(ENV_LANDMARKS)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            music: lookup(ENV_MUSIC)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.music),
            seed,
        }
    }
}
