use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted timer durations: minutes 0..=99, seconds 0..=59, ad-vocem
/// 1..=300 whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub main_minutes: u32,
    pub main_seconds: u32,
    pub ad_seconds: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_minutes: 4,
            main_seconds: 0,
            ad_seconds: 30,
        }
    }
}

impl Config {
    pub fn main_timer_secs(&self) -> u32 {
        self.main_minutes * 60 + self.main_seconds
    }

    pub fn ad_timer_secs(&self) -> u32 {
        self.ad_seconds
    }

    /// Pull out-of-range values back into the supported ranges.
    pub fn clamped(self) -> Self {
        Self {
            main_minutes: self.main_minutes.min(99),
            main_seconds: self.main_seconds.min(59),
            ad_seconds: self.ad_seconds.clamp(1, 300),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "rostrum") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("rostrum_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg.clamped();
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
