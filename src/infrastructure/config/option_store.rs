//! Options persisted in a TOML file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::storage::{ConfigError, save_to_file};
use crate::domain::errors::HostError;
use crate::domain::ports::OptionStorePort;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct OptionState {
    #[serde(default)]
    options: BTreeMap<String, String>,
}

/// Option store written atomically to a TOML file on every change.
pub struct TomlOptionStore {
    path: PathBuf,
    state: Mutex<OptionState>,
}

impl TomlOptionStore {
    /// Opens the store at `path`. A missing or malformed file starts empty.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content).unwrap_or_else(|e| {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to parse options file, starting empty"
                );
                OptionState::default()
            })
        } else {
            OptionState::default()
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    fn update(
        &self,
        key: &str,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), HostError> {
        let mut state = self.state.lock();
        let mut next = state.clone();
        change(&mut next.options);
        save_to_file(&self.path, &next)
            .map_err(|e| HostError::write_failed(format!("option {key}"), e.to_string()))?;
        *state = next;
        debug!(key, "Persisted option");
        Ok(())
    }
}

#[async_trait]
impl OptionStorePort for TomlOptionStore {
    async fn get_option(&self, key: &str) -> Result<Option<String>, HostError> {
        Ok(self.state.lock().options.get(key).cloned())
    }

    async fn set_option(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.update(key, |options| {
            options.insert(key.to_string(), value.to_string());
        })
    }

    async fn delete_option(&self, key: &str) -> Result<(), HostError> {
        if !self.state.lock().options.contains_key(key) {
            return Ok(());
        }
        self.update(key, |options| {
            options.remove(key);
        })
    }
}
