//! Key-value settings consulted while sampling.

use std::{
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

use hashbrown::HashMap;

use super::{config::Config, error::OptionResult, read_config};

/// Whether to show every logical core rather than folding SMT siblings.
pub const SHOW_LOGICAL_CORES: &str = "cpu.show_logical_cores";

/// A read-only view of settings, looked up by key on every use.
pub trait SettingsStore: Send + Sync {
    /// The boolean stored under `key`, or `None` if it is not set.
    fn bool(&self, key: &str) -> Option<bool>;
}

/// Settings held in memory. Values can be changed while a sampler is using
/// the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K: Into<String>>(&self, key: K, value: bool) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> Option<bool> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }
}

impl SettingsStore for MemoryStore {
    fn bool(&self, key: &str) -> Option<bool> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }
}

/// Settings backed by the config file, with fixed overrides (e.g. from
/// command-line flags) that win over whatever the file says.
#[derive(Debug)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    config: RwLock<Config>,
    overrides: HashMap<String, bool>,
}

impl ConfigStore {
    pub fn new(config: Config, path: Option<PathBuf>) -> Self {
        Self {
            path,
            config: RwLock::new(config),
            overrides: HashMap::new(),
        }
    }

    /// Reads the config at `path`. A missing file gives the defaults.
    pub fn load(path: Option<PathBuf>) -> OptionResult<Self> {
        let config = read_config(path.as_deref())?;
        Ok(Self::new(config, path))
    }

    pub fn with_override<K: Into<String>>(mut self, key: K, value: bool) -> Self {
        self.overrides.insert(key.into(), value);
        self
    }

    /// Re-reads the config file. On failure the last good config is kept.
    pub fn reload(&self) -> OptionResult<()> {
        let config = read_config(self.path.as_deref())?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;

        Ok(())
    }

    /// A copy of the current config.
    pub fn config(&self) -> Config {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsStore for ConfigStore {
    fn bool(&self, key: &str) -> Option<bool> {
        if let Some(value) = self.overrides.get(key) {
            return Some(*value);
        }

        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup_bool(key)
    }
}

#[cfg(test)]
mod test {
    use std::{fs, io::Write};

    use super::*;

    #[test]
    fn memory_store_set_and_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.bool(SHOW_LOGICAL_CORES), None);

        store.set(SHOW_LOGICAL_CORES, true);
        assert_eq!(store.bool(SHOW_LOGICAL_CORES), Some(true));

        assert_eq!(store.remove(SHOW_LOGICAL_CORES), Some(true));
        assert_eq!(store.bool(SHOW_LOGICAL_CORES), None);
    }

    #[test]
    fn config_store_reads_cpu_section() {
        let config: Config = toml_edit::de::from_str(
            r#"
            [cpu]
            show_logical_cores = true
            "#,
        )
        .unwrap();

        let store = ConfigStore::new(config, None);
        assert_eq!(store.bool(SHOW_LOGICAL_CORES), Some(true));
        assert_eq!(store.bool("cpu.something_else"), None);
    }

    #[test]
    fn config_store_unset_key_is_none() {
        let store = ConfigStore::new(Config::default(), None);
        assert_eq!(store.bool(SHOW_LOGICAL_CORES), None);
    }

    #[test]
    fn overrides_win() {
        let config: Config = toml_edit::de::from_str(
            r#"
            [cpu]
            show_logical_cores = false
            "#,
        )
        .unwrap();

        let store = ConfigStore::new(config, None).with_override(SHOW_LOGICAL_CORES, true);
        assert_eq!(store.bool(SHOW_LOGICAL_CORES), Some(true));
    }

    #[test]
    fn reload_picks_up_changes_and_keeps_last_good() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpuload.toml");
        fs::write(&path, "[cpu]\nshow_logical_cores = false\n").unwrap();

        let store = ConfigStore::load(Some(path.clone())).unwrap();
        assert_eq!(store.bool(SHOW_LOGICAL_CORES), Some(false));

        fs::write(&path, "[cpu]\nshow_logical_cores = true\n").unwrap();
        store.reload().unwrap();
        assert_eq!(store.bool(SHOW_LOGICAL_CORES), Some(true));

        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"[cpu]\nshow_logical_cores = 12\n").unwrap();
        drop(file);

        assert!(store.reload().is_err());
        assert_eq!(store.bool(SHOW_LOGICAL_CORES), Some(true));
    }
}
