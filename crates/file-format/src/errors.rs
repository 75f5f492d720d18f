use std::path::PathBuf;

use design_types::FurnitureKind;

/// Why a stored snapshot list could not be read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("malformed design list: {0}")]
    ParseError(String),

    #[error("not a furniture design list (format {0:?})")]
    UnknownFormat(String),

    #[error("file holds {found} designs, expected {expected}")]
    WrongKind {
        expected: FurnitureKind,
        found: FurnitureKind,
    },

    #[error("design list version {file_version} is newer than {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("cannot upgrade design list from v{from} to v{to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize designs: {0}")]
    Serialize(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}
