use std::path::PathBuf;

use design_types::DesignParameters;
use file_format::{JsonFileStorage, MemoryStorage, SnapshotStorage};
use furniture_tessellation::MeshConfig;
use serde::{Deserialize, Serialize};

/// Runtime settings for a design store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory for the saved-design file. `None` keeps designs in memory.
    pub storage_dir: Option<PathBuf>,
    /// File stem under `storage_dir`. `None` uses the furniture family's key.
    pub storage_key: Option<String>,
    /// Extra write attempts after a failed persist.
    pub persist_retries: u32,
    pub mesh: MeshConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            storage_key: None,
            persist_retries: 2,
            mesh: MeshConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Nothing touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Persist to `<dir>/<key>.json`.
    pub fn with_storage_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn storage_key_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.storage_key.as_deref().unwrap_or(fallback)
    }

    /// Build the backend described by this config.
    pub fn open_storage<P: DesignParameters + 'static>(
        &self,
        default_key: &str,
    ) -> Box<dyn SnapshotStorage<P>> {
        match &self.storage_dir {
            Some(dir) => Box::new(JsonFileStorage::<P>::new(
                dir.clone(),
                self.storage_key_or(default_key),
            )),
            None => Box::new(MemoryStorage::new()),
        }
    }
}
