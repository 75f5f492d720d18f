use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors raised while mutating a parameter record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown parameter field: {name}")]
    InvalidField { name: String },

    #[error("invalid value {value:?} for field {field}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ParamError {
    pub(crate) fn invalid_value(
        field: impl fmt::Display,
        value: &ParamValue,
        reason: impl Into<String>,
    ) -> Self {
        ParamError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// A raw value headed for a parameter field.
///
/// UI sliders send numbers; free-text suggestions send strings such as
/// `"75cm"`, `"bronze"` or `"#FF8800"`. Each field decides how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

/// Unit suffixes tolerated on numeric text.
const UNIT_SUFFIXES: [&str; 5] = ["cm", "deg", "°", "%", "度"];

impl ParamValue {
    /// Read the value as a number, stripping a trailing unit if present.
    pub fn as_number(&self, field: impl fmt::Display) -> Result<f64, ParamError> {
        match self {
            ParamValue::Number(n) => Ok(*n),
            ParamValue::Text(text) => {
                let mut trimmed = text.trim();
                for suffix in UNIT_SUFFIXES {
                    if let Some(rest) = trimmed.strip_suffix(suffix) {
                        trimmed = rest.trim_end();
                        break;
                    }
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|e| ParamError::invalid_value(field, self, e.to_string()))
            }
        }
    }

    /// Parse a textual value into an enum-like type.
    pub fn parse_as<T>(&self, field: impl fmt::Display) -> Result<T, ParamError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self {
            ParamValue::Text(text) => text
                .trim()
                .parse::<T>()
                .map_err(|e| ParamError::invalid_value(field, self, e.to_string())),
            ParamValue::Number(_) => Err(ParamError::invalid_value(
                field,
                self,
                "expected a name, got a number",
            )),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(t) => f.write_str(t),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

/// Declared range, default and precision of one scalar field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Values are snapped to multiples of this before clamping.
    pub step: f64,
}

impl FieldSpec {
    pub const fn new(min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
        }
    }

    /// Quantise to the field's step and clamp into range.
    ///
    /// Returns `None` for NaN or infinite input.
    pub fn apply(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let snapped = (value / self.step).round() * self.step;
        Some(snapped.clamp(self.min, self.max))
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Write a numeric value into `slot` under the field's spec.
pub(crate) fn set_scalar(
    slot: &mut f64,
    spec: FieldSpec,
    field: impl fmt::Display + Copy,
    value: &ParamValue,
) -> Result<(), ParamError> {
    let raw = value.as_number(field)?;
    *slot = spec
        .apply(raw)
        .ok_or_else(|| ParamError::invalid_value(field, value, "value is not finite"))?;
    Ok(())
}

/// Re-apply a spec to a stored value, falling back to the default for garbage.
pub(crate) fn sanitize(slot: &mut f64, spec: FieldSpec) {
    *slot = spec.apply(*slot).unwrap_or(spec.default);
}

/// Canonical lookup key for a field name: lowercase, separators removed.
///
/// `leg_height`, `legHeight` and `Leg Height` all map to `legheight`.
pub fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
