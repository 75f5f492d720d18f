use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::field::{ParamError, ParamValue};
use crate::material::{Material, Rgb};

/// The furniture families the configurator knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureKind {
    Table,
    Chair,
}

impl FurnitureKind {
    pub fn name(&self) -> &'static str {
        match self {
            FurnitureKind::Table => "table",
            FurnitureKind::Chair => "chair",
        }
    }
}

impl fmt::Display for FurnitureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed record of design variables with validated mutation.
///
/// Implementors uphold one invariant: after any successful `set`/`update`,
/// every scalar lies inside its declared range. Geometry and pricing rely on
/// it and never re-check.
pub trait DesignParameters:
    Clone + PartialEq + fmt::Debug + Default + Serialize + DeserializeOwned
{
    /// Field identifier; parses from any accepted spelling of the field name.
    type Field: Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = ParamError> + 'static;

    const KIND: FurnitureKind;

    /// Every field, in display order.
    fn fields() -> &'static [Self::Field];

    fn get(&self, field: Self::Field) -> ParamValue;

    /// Write a value, quantising and clamping scalars.
    fn set(&mut self, field: Self::Field, value: &ParamValue) -> Result<(), ParamError>;

    fn material(&self) -> Material;

    /// The stored plastic colour; inert unless `material()` is plastic.
    fn plastic_color(&self) -> Rgb;

    /// Re-apply every field's range, e.g. after deserializing foreign data.
    fn sanitize(&mut self);

    /// True when every scalar lies inside its declared range.
    fn is_within_ranges(&self) -> bool;

    /// Name-based mutation used by UI glue and suggestion deltas.
    fn update(&mut self, name: &str, value: &ParamValue) -> Result<(), ParamError> {
        let field: Self::Field = name.parse()?;
        self.set(field, value)?;
        debug_assert!(self.is_within_ranges(), "{} left out of range", field);
        Ok(())
    }
}

/// A named, immutable-at-rest snapshot of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDesign<P> {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value copy of the parameters at save time.
    pub parameters: P,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<P: Clone> SavedDesign<P> {
    /// Snapshot `parameters` under a fresh id and the current timestamp.
    pub fn new(name: impl Into<String>, description: Option<String>, parameters: &P) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            parameters: parameters.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}
