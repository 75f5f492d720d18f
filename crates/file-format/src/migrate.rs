use chrono::{DateTime, Utc};
use design_types::{DesignParameters, ParamValue};
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::errors::LoadError;
use crate::save::FORMAT_ID;

/// Version assigned to the browser app's `{ state: { savedDesigns } }` blob.
pub const LEGACY_VERSION: u32 = 0;

/// Apply format migrations from `from_version` to `to_version`.
///
/// Migrations are applied sequentially on the raw document: v0→v1, v1→v2,
/// etc. The result has the shape of `to_version`.
pub fn migrate<P: DesignParameters>(
    doc: Value,
    from_version: u32,
    to_version: u32,
) -> Result<Value, LoadError> {
    let mut doc = doc;
    let mut version = from_version;
    while version < to_version {
        doc = match version {
            LEGACY_VERSION => migrate_v0_to_v1::<P>(doc)?,
            _ => {
                return Err(LoadError::MigrationFailed {
                    from: from_version,
                    to: to_version,
                    reason: format!("no migration path from v{} to v{}", version, version + 1),
                });
            }
        };
        version += 1;
    }
    Ok(doc)
}

fn legacy_error(reason: impl Into<String>) -> LoadError {
    LoadError::MigrationFailed {
        from: LEGACY_VERSION,
        to: LEGACY_VERSION + 1,
        reason: reason.into(),
    }
}

fn migrate_v0_to_v1<P: DesignParameters>(doc: Value) -> Result<Value, LoadError> {
    let entries = match doc.pointer("/state/savedDesigns") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries.clone(),
        Some(_) => return Err(legacy_error("savedDesigns is not an array")),
    };

    let designs = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| legacy_design::<P>(index, entry))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = designs.len(), kind = %P::KIND, "migrated legacy designs");

    Ok(json!({
        "format": FORMAT_ID,
        "version": LEGACY_VERSION + 1,
        "kind": P::KIND,
        "saved_designs": designs,
    }))
}

fn legacy_design<P: DesignParameters>(index: usize, entry: &Value) -> Result<Value, LoadError> {
    let obj = entry
        .as_object()
        .ok_or_else(|| legacy_error(format!("design #{} is not an object", index)))?;

    // Timestamp ids from the browser app are not UUIDs.
    let id = str_field(obj, "id")
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let name = str_field(obj, "name")
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("Untitled")
        .to_string();
    let description = str_field(obj, "description")
        .filter(|d| !d.trim().is_empty())
        .map(str::to_string);
    let now = Utc::now();
    let created_at = timestamp(obj, "createdAt").unwrap_or(now);
    let updated_at = timestamp(obj, "updatedAt").unwrap_or(created_at);

    let mut parameters = P::default();
    if let Some(Value::Object(legacy)) = obj.get("parameters") {
        for (key, value) in legacy {
            let Ok(value) = serde_json::from_value::<ParamValue>(value.clone()) else {
                debug!(%key, "skipping non-scalar legacy parameter");
                continue;
            };
            if let Err(err) = parameters.update(key, &value) {
                debug!(%key, %err, "dropping legacy parameter");
            }
        }
    }

    let mut out = Map::new();
    out.insert("id".into(), json!(id));
    out.insert("name".into(), json!(name));
    if let Some(description) = description {
        out.insert("description".into(), json!(description));
    }
    out.insert(
        "parameters".into(),
        serde_json::to_value(&parameters).map_err(|e| legacy_error(e.to_string()))?,
    );
    out.insert("created_at".into(), json!(created_at));
    out.insert("updated_at".into(), json!(updated_at));
    Ok(Value::Object(out))
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

fn timestamp(obj: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    str_field(obj, key)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}
