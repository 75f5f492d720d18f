//! Key-value backends for the saved-design list.

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use design_types::{DesignParameters, SavedDesign};
use tracing::{debug, info, warn};

use crate::errors::StorageError;
use crate::load::load_designs;
use crate::save::save_designs;

/// Default storage key, shared with the browser app.
pub const DEFAULT_STORAGE_KEY: &str = "table-design-storage";

/// Where a store keeps its snapshot list between sessions.
pub trait SnapshotStorage<P: DesignParameters> {
    /// Read the persisted list. A backend with nothing stored yields an empty list.
    fn load(&self) -> Result<Vec<SavedDesign<P>>, StorageError>;

    /// Replace the persisted list.
    fn store(&mut self, designs: &[SavedDesign<P>]) -> Result<(), StorageError>;

    /// Keep whatever is persisted now out of reach of the next `store`.
    ///
    /// Called before overwriting a list that could not be loaded, so that a
    /// newer or damaged file is preserved instead of replaced.
    fn set_aside(&mut self) -> Result<(), StorageError>;
}

/// Holds the serialized file in memory. Round trips go through the same
/// JSON format as the file backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: Option<String>,
    set_aside: Vec<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document, e.g. a legacy browser export.
    pub fn with_contents(json: impl Into<String>) -> Self {
        Self {
            contents: Some(json.into()),
            set_aside: Vec::new(),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Documents moved out of the way, oldest first.
    pub fn set_aside_contents(&self) -> &[String] {
        &self.set_aside
    }
}

impl<P: DesignParameters> SnapshotStorage<P> for MemoryStorage {
    fn load(&self) -> Result<Vec<SavedDesign<P>>, StorageError> {
        match &self.contents {
            Some(json) => Ok(load_designs(json)?),
            None => Ok(Vec::new()),
        }
    }

    fn store(&mut self, designs: &[SavedDesign<P>]) -> Result<(), StorageError> {
        self.contents = Some(save_designs(designs)?);
        Ok(())
    }

    fn set_aside(&mut self) -> Result<(), StorageError> {
        if let Some(json) = self.contents.take() {
            self.set_aside.push(json);
        }
        Ok(())
    }
}

/// One JSON file per key: `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a crash mid-write leaves the previous list intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage<P> {
    dir: PathBuf,
    key: String,
    _kind: PhantomData<fn() -> P>,
}

impl<P> JsonFileStorage<P> {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
            _kind: PhantomData,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", self.key))
    }

    /// First unused backup name: `<key>.json.bak`, then `<key>.json.bak.1`, ...
    pub fn backup_path(&self) -> PathBuf {
        let first = self.dir.join(format!("{}.json.bak", self.key));
        if !first.exists() {
            return first;
        }
        (1u32..)
            .map(|n| self.dir.join(format!("{}.json.bak.{n}", self.key)))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl<P: DesignParameters> SnapshotStorage<P> for JsonFileStorage<P> {
    fn load(&self) -> Result<Vec<SavedDesign<P>>, StorageError> {
        let path = self.path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no saved designs yet");
                return Ok(Vec::new());
            }
            Err(err) => return Err(io_error(&path, err)),
        };
        let designs = load_designs(&json)?;
        info!(path = %path.display(), count = designs.len(), "loaded saved designs");
        Ok(designs)
    }

    fn store(&mut self, designs: &[SavedDesign<P>]) -> Result<(), StorageError> {
        let json = save_designs(designs)?;
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| io_error(&temp, e))?;
        let path = self.path();
        fs::rename(&temp, &path).map_err(|e| io_error(&path, e))?;
        debug!(path = %path.display(), count = designs.len(), "stored saved designs");
        Ok(())
    }

    fn set_aside(&mut self) -> Result<(), StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(());
        }
        let backup = self.backup_path();
        fs::rename(&path, &backup).map_err(|e| io_error(&path, e))?;
        warn!(
            path = %path.display(),
            backup = %backup.display(),
            "moved unreadable design list aside"
        );
        Ok(())
    }
}
