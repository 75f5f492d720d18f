use design_types::{DesignParameters, FurnitureKind, SavedDesign};
use serde::Serialize;

use crate::errors::StorageError;

/// Format identifier written into every file.
pub const FORMAT_ID: &str = "furniture-designs";

/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level file structure.
#[derive(Debug, Clone, Serialize)]
pub struct DesignFile<'a, P> {
    /// Format identifier.
    pub format: &'a str,
    /// Format version number.
    pub version: u32,
    /// Which furniture family the designs describe.
    pub kind: FurnitureKind,
    pub saved_designs: &'a [SavedDesign<P>],
}

/// Serialize a snapshot list to a pretty-printed JSON string.
pub fn save_designs<P: DesignParameters>(designs: &[SavedDesign<P>]) -> Result<String, StorageError> {
    let file = DesignFile {
        format: FORMAT_ID,
        version: FORMAT_VERSION,
        kind: P::KIND,
        saved_designs: designs,
    };
    serde_json::to_string_pretty(&file).map_err(|e| StorageError::Serialize(e.to_string()))
}
