//! Versioned JSON persistence for saved furniture designs.

pub mod errors;
pub mod load;
pub mod migrate;
pub mod save;
pub mod storage;

pub use errors::{LoadError, StorageError};
pub use load::load_designs;
pub use save::{save_designs, FORMAT_ID, FORMAT_VERSION};
pub use storage::{JsonFileStorage, MemoryStorage, SnapshotStorage, DEFAULT_STORAGE_KEY};
