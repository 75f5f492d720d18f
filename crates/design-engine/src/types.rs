use design_types::ParamValue;
use file_format::StorageError;
use serde::{Deserialize, Serialize};

/// Errors from the design store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid design: {0}")]
    Validation(String),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StorageError),
}

/// One named value headed for a parameter field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub field: String,
    pub value: ParamValue,
}

impl ParameterChange {
    pub fn new(field: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A change that was dropped, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoredChange {
    pub field: String,
    pub reason: String,
}

/// Outcome of a batch update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateReport {
    /// Canonical names of the fields that were written, in order.
    pub applied: Vec<String>,
    pub ignored: Vec<IgnoredChange>,
}

impl UpdateReport {
    pub fn is_clean(&self) -> bool {
        self.ignored.is_empty()
    }
}
