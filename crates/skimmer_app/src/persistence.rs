use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use skim_logging::{skim_error, skim_info, skim_warn};
use skimmer_core::{SettingsSnapshot, SpeedProfile};
use tempfile::NamedTempFile;

const SETTINGS_FILENAME: &str = ".skimmer.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSettings {
    speed: String,
    concurrency: u8,
    visit_target: u8,
}

/// Loads user preferences once at startup and writes them back on change.
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn in_current_dir() -> Self {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(dir)
    }

    /// Missing or corrupt settings fall back to the defaults with a warning;
    /// clamping happens in the core when the snapshot is applied.
    pub fn load(&self) -> SettingsSnapshot {
        let path = self.dir.join(SETTINGS_FILENAME);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return SettingsSnapshot::default();
            }
            Err(err) => {
                skim_warn!("Failed to read settings from {:?}: {}", path, err);
                return SettingsSnapshot::default();
            }
        };

        let persisted: PersistedSettings = match ron::from_str(&content) {
            Ok(persisted) => persisted,
            Err(err) => {
                skim_warn!("Failed to parse settings from {:?}: {}", path, err);
                return SettingsSnapshot::default();
            }
        };

        let speed = match SpeedProfile::from_key(&persisted.speed) {
            Some(speed) => speed,
            None => {
                skim_warn!("Unknown speed profile {:?}, using default", persisted.speed);
                SpeedProfile::default()
            }
        };

        skim_info!("Loaded settings from {:?}", path);
        SettingsSnapshot {
            speed,
            concurrency: persisted.concurrency,
            visit_target: persisted.visit_target,
        }
    }

    pub fn save(&self, snapshot: &SettingsSnapshot) {
        let persisted = PersistedSettings {
            speed: snapshot.speed.key().to_string(),
            concurrency: snapshot.concurrency,
            visit_target: snapshot.visit_target,
        };

        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&persisted, pretty) {
            Ok(text) => text,
            Err(err) => {
                skim_error!("Failed to serialize settings: {}", err);
                return;
            }
        };

        if let Err(err) = self.write_atomic(&content) {
            skim_error!("Failed to write settings to {:?}: {}", self.dir, err);
        }
    }

    // Temp file plus rename, so a crash never leaves a torn settings file.
    fn write_atomic(&self, content: &str) -> std::io::Result<()> {
        let target = self.dir.join(SETTINGS_FILENAME);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|err| err.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        skim_logging::initialize_for_tests();
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().to_path_buf());

        let snapshot = SettingsSnapshot {
            speed: SpeedProfile::Turbo,
            concurrency: 5,
            visit_target: 25,
        };
        store.save(&snapshot);
        assert_eq!(store.load(), snapshot);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().to_path_buf());
        assert_eq!(store.load(), SettingsSnapshot::default());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILENAME), "not ron at all").unwrap();
        let store = SettingsStore::new(dir.path().to_path_buf());
        assert_eq!(store.load(), SettingsSnapshot::default());
    }

    #[test]
    fn unknown_speed_key_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"(speed: "ludicrous", concurrency: 4, visit_target: 20)"#,
        )
        .unwrap();
        let store = SettingsStore::new(dir.path().to_path_buf());
        let loaded = store.load();
        assert_eq!(loaded.speed, SpeedProfile::Normal);
        assert_eq!(loaded.concurrency, 4);
    }
}
