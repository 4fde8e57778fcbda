// src/config/mod.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::errors::SkyError;

/// Default mixer volume on the 0..=255 launcher scale (96 in game units).
pub const DEFAULT_MIXER_VOLUME: i64 = 192;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    settings: BTreeMap<String, Value>,
}

/// Key/value settings persisted as JSON, with a defaults layer that is
/// never written back.
pub struct ConfigStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, Value>,
    defaults: BTreeMap<String, Value>,
}

impl ConfigStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
            defaults: BTreeMap::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, SkyError> {
        let values = if path.exists() {
            let bytes = std::fs::read(path)?;
            let file: ConfigFile = serde_json::from_slice(&bytes)?;
            log::info!("Loaded {} settings from {}", file.settings.len(), path.display());
            file.settings
        } else {
            log::info!("No config file at {}, starting with defaults", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
            defaults: BTreeMap::new(),
        })
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn register_default(&mut self, key: &str, value: impl Into<Value>) {
        self.defaults.insert(key.to_string(), value.into());
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        self.values.get(key).or_else(|| self.defaults.get(key))
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Missing or unparsable values read as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        match self.lookup(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().map(|v| v != 0).unwrap_or(false),
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            ),
            _ => false,
        }
    }

    /// Missing or unparsable values read as `0`.
    pub fn get_int(&self, key: &str) -> i64 {
        match self.lookup(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            Some(Value::Bool(b)) => *b as i64,
            _ => 0,
        }
    }

    pub fn flush_to_disk(&self) -> Result<(), SkyError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let file = ConfigFile {
            settings: self.values.clone(),
        };
        let serialized = serde_json::to_vec_pretty(&file)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serialized)?;

        log::debug!("Settings written to: {}", path.display());
        Ok(())
    }
}

/// Registers the mixer defaults the engine expects before the first sync.
pub fn register_sound_defaults(config: &mut ConfigStore) {
    config.register_default("sfx_volume", DEFAULT_MIXER_VOLUME);
    config.register_default("music_volume", DEFAULT_MIXER_VOLUME);
    config.register_default("speech_volume", DEFAULT_MIXER_VOLUME);
    config.register_default("mute", false);
}

/// Launcher volumes are 0..=255, the music driver takes 0..=127.
pub fn music_volume(config: &ConfigStore) -> u8 {
    if config.has_key("mute") && config.get_bool("mute") {
        return 0;
    }
    (config.get_int("music_volume") >> 1).clamp(0, 127) as u8
}
