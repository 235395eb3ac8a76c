use crate::foundation::error::{LooperError, LooperResult};
use crate::looper::config::IterationConfig;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key the last used config is stored under.
pub const CONFIG_KEY: &str = "looper-config";

/// Key-value persistence for panel state.
pub trait ConfigStore {
    /// Stored value for `key`.
    fn get(&self, key: &str) -> LooperResult<Option<Value>>;

    /// Replace the value for `key`.
    fn set(&mut self, key: &str, value: Value) -> LooperResult<()>;

    /// Last persisted config.
    ///
    /// A stored value that no longer parses is reported as absent.
    fn load_config(&self) -> LooperResult<Option<IterationConfig>> {
        let Some(value) = self.get(CONFIG_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(config) => Ok(Some(config)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable stored config");
                Ok(None)
            }
        }
    }

    /// Persist `config` verbatim.
    fn save_config(&mut self, config: &IterationConfig) -> LooperResult<()> {
        let value = serde_json::to_value(config).map_err(|e| LooperError::serde(e.to_string()))?;
        self.set(CONFIG_KEY, value)
    }
}

/// Store kept in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> LooperResult<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> LooperResult<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Store backed by one JSON object on disk.
///
/// The file is read on every access and rewritten through a sibling temp file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `path`; the file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> LooperResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(LooperError::serde(format!(
                "store '{}' is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(LooperError::serde(format!(
                "store '{}': {e}",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> LooperResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let text = serde_json::to_string_pretty(map).map_err(|e| LooperError::serde(e.to_string()))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ConfigStore for JsonFileStore {
    fn get(&self, key: &str) -> LooperResult<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> LooperResult<()> {
        let mut map = self.read_all()?;
        map.insert(key.to_owned(), value);
        self.write_all(&map)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/store.rs"]
mod tests;
