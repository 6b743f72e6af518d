use anyhow::Result;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::app::Goal;
use crate::session::TimerSettings;
use pomo_ipc::StatsSnapshot;

const SETTINGS_FILE: &str = "settings.json";
const STATS_FILE: &str = "stats.json";
const GOALS_FILE: &str = "goals.json";

/// On-disk storage, one JSON file per slot under the platform data dir.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "pomo", "pomo")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::open_at(proj_dirs.data_dir().to_path_buf())
    }

    pub fn open_at(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn load_settings(&self) -> TimerSettings {
        self.read_slot(SETTINGS_FILE)
    }

    pub fn save_settings(&self, settings: &TimerSettings) -> Result<()> {
        self.write_slot(SETTINGS_FILE, settings)
    }

    pub fn load_stats(&self) -> StatsSnapshot {
        self.read_slot(STATS_FILE)
    }

    pub fn save_stats(&self, stats: &StatsSnapshot) -> Result<()> {
        self.write_slot(STATS_FILE, stats)
    }

    pub fn load_goals(&self) -> Vec<Goal> {
        self.read_slot(GOALS_FILE)
    }

    pub fn save_goals(&self, goals: &[Goal]) -> Result<()> {
        self.write_slot(GOALS_FILE, &goals)
    }

    /// A missing or unreadable slot falls back to its default so a bad
    /// file never blocks startup.
    fn read_slot<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.dir.join(name);
        if !path.exists() {
            return T::default();
        }
        let parsed = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|json| serde_json::from_str(&json).map_err(anyhow::Error::from));
        match parsed {
            Ok(value) => value,
            Err(err) => {
                warn!(file = name, error = %err, "unreadable slot, using defaults");
                T::default()
            }
        }
    }

    fn write_slot<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.dir.join(name), json)?;
        Ok(())
    }
}
