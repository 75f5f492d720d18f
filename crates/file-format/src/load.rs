use design_types::{DesignParameters, FurnitureKind, SavedDesign};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::LoadError;
use crate::migrate::{migrate, LEGACY_VERSION};
use crate::save::{FORMAT_ID, FORMAT_VERSION};

/// The top-level file structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct DesignFileRaw<P> {
    pub format: String,
    pub version: u32,
    pub kind: FurnitureKind,
    #[serde(default = "Vec::new")]
    pub saved_designs: Vec<SavedDesign<P>>,
}

/// Deserialize a snapshot list from a JSON string.
///
/// Validates the format identifier, furniture kind and version. Older files,
/// including the browser app's storage blob, are migrated first. Loaded
/// parameters are re-clamped to their current ranges.
pub fn load_designs<P: DesignParameters>(json: &str) -> Result<Vec<SavedDesign<P>>, LoadError> {
    let doc: Value = serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    let version = detect_version(&doc)?;
    if version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: version,
            supported_version: FORMAT_VERSION,
        });
    }

    // Apply migrations if needed (version < current)
    let doc = if version < FORMAT_VERSION {
        debug!(from = version, to = FORMAT_VERSION, "migrating design file");
        migrate::<P>(doc, version, FORMAT_VERSION)?
    } else {
        doc
    };

    let raw: DesignFileRaw<P> =
        serde_json::from_value(doc).map_err(|e| LoadError::ParseError(e.to_string()))?;
    if raw.format != FORMAT_ID {
        return Err(LoadError::UnknownFormat(raw.format));
    }
    if raw.kind != P::KIND {
        return Err(LoadError::WrongKind {
            expected: P::KIND,
            found: raw.kind,
        });
    }

    let mut designs = raw.saved_designs;
    for design in &mut designs {
        design.parameters.sanitize();
    }
    Ok(designs)
}

/// Read the version without committing to a schema.
fn detect_version(doc: &Value) -> Result<u32, LoadError> {
    match doc.get("format") {
        Some(Value::String(format)) if format == FORMAT_ID => doc
            .get("version")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| LoadError::ParseError("missing or invalid version".to_string())),
        Some(Value::String(format)) => Err(LoadError::UnknownFormat(format.clone())),
        Some(other) => Err(LoadError::UnknownFormat(other.to_string())),
        None if doc.get("state").is_some() => Ok(LEGACY_VERSION),
        None => Err(LoadError::UnknownFormat("<missing>".to_string())),
    }
}
