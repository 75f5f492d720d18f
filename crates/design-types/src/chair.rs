use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::design::{DesignParameters, FurnitureKind};
use crate::field::{normalize_field_name, sanitize, set_scalar, FieldSpec, ParamError, ParamValue};
use crate::material::{Material, Rgb};

/// Ranges of the chair's scalar fields (centimetres, degrees).
pub mod limits {
    use crate::field::FieldSpec;

    pub const SEAT_WIDTH: FieldSpec = FieldSpec::new(40.0, 80.0, 50.0, 1.0);
    pub const SEAT_DEPTH: FieldSpec = FieldSpec::new(35.0, 60.0, 45.0, 1.0);
    pub const SEAT_HEIGHT: FieldSpec = FieldSpec::new(40.0, 80.0, 70.0, 1.0);
    pub const BACKREST_HEIGHT: FieldSpec = FieldSpec::new(30.0, 100.0, 30.0, 1.0);
    pub const BACKREST_ANGLE: FieldSpec = FieldSpec::new(90.0, 120.0, 100.0, 1.0);
}

pub const DEFAULT_CHAIR_PLASTIC_COLOR: Rgb = Rgb::new(0x8B, 0x45, 0x13);

/// Leg family of a chair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegStyle {
    Modern,
    Classic,
    Industrial,
}

impl LegStyle {
    pub fn name(&self) -> &'static str {
        match self {
            LegStyle::Modern => "modern",
            LegStyle::Classic => "classic",
            LegStyle::Industrial => "industrial",
        }
    }
}

impl fmt::Display for LegStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown leg style: {0}")]
pub struct UnknownLegStyle(pub String);

impl FromStr for LegStyle {
    type Err = UnknownLegStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(LegStyle::Modern),
            "classic" => Ok(LegStyle::Classic),
            "industrial" => Ok(LegStyle::Industrial),
            _ => Err(UnknownLegStyle(s.to_string())),
        }
    }
}

/// Design variables of a chair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChairParameters {
    pub seat_width: f64,
    pub seat_depth: f64,
    pub seat_height: f64,
    pub backrest_height: f64,
    pub backrest_angle: f64,
    pub leg_style: LegStyle,
    pub material: Material,
    #[serde(alias = "color")]
    pub plastic_color: Rgb,
}

impl Default for ChairParameters {
    fn default() -> Self {
        Self {
            seat_width: limits::SEAT_WIDTH.default,
            seat_depth: limits::SEAT_DEPTH.default,
            seat_height: limits::SEAT_HEIGHT.default,
            backrest_height: limits::BACKREST_HEIGHT.default,
            backrest_angle: limits::BACKREST_ANGLE.default,
            leg_style: LegStyle::Modern,
            material: Material::Titanium,
            plastic_color: DEFAULT_CHAIR_PLASTIC_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChairField {
    SeatWidth,
    SeatDepth,
    SeatHeight,
    BackrestHeight,
    BackrestAngle,
    LegStyle,
    Material,
    PlasticColor,
}

impl ChairField {
    pub const ALL: [ChairField; 8] = [
        ChairField::SeatWidth,
        ChairField::SeatDepth,
        ChairField::SeatHeight,
        ChairField::BackrestHeight,
        ChairField::BackrestAngle,
        ChairField::LegStyle,
        ChairField::Material,
        ChairField::PlasticColor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChairField::SeatWidth => "seat_width",
            ChairField::SeatDepth => "seat_depth",
            ChairField::SeatHeight => "seat_height",
            ChairField::BackrestHeight => "backrest_height",
            ChairField::BackrestAngle => "backrest_angle",
            ChairField::LegStyle => "leg_style",
            ChairField::Material => "material",
            ChairField::PlasticColor => "plastic_color",
        }
    }

    pub fn spec(&self) -> Option<FieldSpec> {
        match self {
            ChairField::SeatWidth => Some(limits::SEAT_WIDTH),
            ChairField::SeatDepth => Some(limits::SEAT_DEPTH),
            ChairField::SeatHeight => Some(limits::SEAT_HEIGHT),
            ChairField::BackrestHeight => Some(limits::BACKREST_HEIGHT),
            ChairField::BackrestAngle => Some(limits::BACKREST_ANGLE),
            ChairField::LegStyle | ChairField::Material | ChairField::PlasticColor => None,
        }
    }
}

impl fmt::Display for ChairField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChairField {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_field_name(s).as_str() {
            "seatwidth" => Ok(ChairField::SeatWidth),
            "seatdepth" => Ok(ChairField::SeatDepth),
            "seatheight" => Ok(ChairField::SeatHeight),
            "backrestheight" | "backheight" => Ok(ChairField::BackrestHeight),
            "backrestangle" => Ok(ChairField::BackrestAngle),
            "legstyle" => Ok(ChairField::LegStyle),
            "material" => Ok(ChairField::Material),
            "plasticcolor" | "color" => Ok(ChairField::PlasticColor),
            _ => Err(ParamError::InvalidField {
                name: s.to_string(),
            }),
        }
    }
}

impl ChairParameters {
    fn scalar_mut(&mut self, field: ChairField) -> Option<&mut f64> {
        match field {
            ChairField::SeatWidth => Some(&mut self.seat_width),
            ChairField::SeatDepth => Some(&mut self.seat_depth),
            ChairField::SeatHeight => Some(&mut self.seat_height),
            ChairField::BackrestHeight => Some(&mut self.backrest_height),
            ChairField::BackrestAngle => Some(&mut self.backrest_angle),
            _ => None,
        }
    }

    fn scalar(&self, field: ChairField) -> Option<f64> {
        match field {
            ChairField::SeatWidth => Some(self.seat_width),
            ChairField::SeatDepth => Some(self.seat_depth),
            ChairField::SeatHeight => Some(self.seat_height),
            ChairField::BackrestHeight => Some(self.backrest_height),
            ChairField::BackrestAngle => Some(self.backrest_angle),
            _ => None,
        }
    }
}

impl DesignParameters for ChairParameters {
    type Field = ChairField;

    const KIND: FurnitureKind = FurnitureKind::Chair;

    fn fields() -> &'static [ChairField] {
        &ChairField::ALL
    }

    fn get(&self, field: ChairField) -> ParamValue {
        match field {
            ChairField::LegStyle => ParamValue::Text(self.leg_style.name().to_string()),
            ChairField::Material => ParamValue::Text(self.material.name().to_string()),
            ChairField::PlasticColor => ParamValue::Text(self.plastic_color.to_hex()),
            scalar => ParamValue::Number(self.scalar(scalar).unwrap_or_default()),
        }
    }

    fn set(&mut self, field: ChairField, value: &ParamValue) -> Result<(), ParamError> {
        match field {
            ChairField::LegStyle => self.leg_style = value.parse_as(field)?,
            ChairField::Material => self.material = value.parse_as(field)?,
            ChairField::PlasticColor => self.plastic_color = value.parse_as(field)?,
            scalar => {
                if let (Some(spec), Some(slot)) = (scalar.spec(), self.scalar_mut(scalar)) {
                    set_scalar(slot, spec, scalar, value)?;
                }
            }
        }
        Ok(())
    }

    fn material(&self) -> Material {
        self.material
    }

    fn plastic_color(&self) -> Rgb {
        self.plastic_color
    }

    fn sanitize(&mut self) {
        for field in ChairField::ALL {
            if let (Some(spec), Some(slot)) = (field.spec(), self.scalar_mut(field)) {
                sanitize(slot, spec);
            }
        }
    }

    fn is_within_ranges(&self) -> bool {
        ChairField::ALL.iter().all(|field| match (field.spec(), self.scalar(*field)) {
            (Some(spec), Some(value)) => spec.contains(value),
            _ => true,
        })
    }
}
