use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::design::{DesignParameters, FurnitureKind};
use crate::field::{normalize_field_name, sanitize, set_scalar, FieldSpec, ParamError, ParamValue};
use crate::material::{Material, Rgb};

/// Ranges of the table's scalar fields (centimetres, degrees, percent).
pub mod limits {
    use crate::field::FieldSpec;

    pub const WIDTH: FieldSpec = FieldSpec::new(40.0, 120.0, 60.0, 1.0);
    pub const LENGTH: FieldSpec = FieldSpec::new(80.0, 200.0, 120.0, 1.0);
    pub const LEG_HEIGHT: FieldSpec = FieldSpec::new(60.0, 90.0, 75.0, 1.0);
    pub const LEG_TOP_RADIUS: FieldSpec = FieldSpec::new(2.0, 10.0, 4.0, 0.5);
    pub const LEG_BOTTOM_RADIUS: FieldSpec = FieldSpec::new(1.0, 8.0, 2.0, 0.5);
    pub const LEG_TILT_ANGLE_DEG: FieldSpec = FieldSpec::new(0.0, 30.0, 0.0, 1.0);
    pub const TOP_THICKNESS: FieldSpec = FieldSpec::new(2.0, 8.0, 3.0, 0.5);
    pub const ROUNDED_CORNER_PERCENT: FieldSpec = FieldSpec::new(5.0, 95.0, 5.0, 1.0);
}

pub const DEFAULT_TABLE_PLASTIC_COLOR: Rgb = Rgb::new(0x2C, 0x2C, 0x2C);

/// Design variables of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableParameters {
    pub width: f64,
    pub length: f64,
    pub leg_height: f64,
    pub leg_top_radius: f64,
    pub leg_bottom_radius: f64,
    pub leg_tilt_angle_deg: f64,
    pub top_thickness: f64,
    pub rounded_corner_percent: f64,
    pub material: Material,
    pub plastic_color: Rgb,
}

impl Default for TableParameters {
    fn default() -> Self {
        Self {
            width: limits::WIDTH.default,
            length: limits::LENGTH.default,
            leg_height: limits::LEG_HEIGHT.default,
            leg_top_radius: limits::LEG_TOP_RADIUS.default,
            leg_bottom_radius: limits::LEG_BOTTOM_RADIUS.default,
            leg_tilt_angle_deg: limits::LEG_TILT_ANGLE_DEG.default,
            top_thickness: limits::TOP_THICKNESS.default,
            rounded_corner_percent: limits::ROUNDED_CORNER_PERCENT.default,
            material: Material::StainlessSteel,
            plastic_color: DEFAULT_TABLE_PLASTIC_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableField {
    Width,
    Length,
    LegHeight,
    LegTopRadius,
    LegBottomRadius,
    LegTiltAngleDeg,
    TopThickness,
    RoundedCornerPercent,
    Material,
    PlasticColor,
}

impl TableField {
    pub const ALL: [TableField; 10] = [
        TableField::Width,
        TableField::Length,
        TableField::LegHeight,
        TableField::LegTopRadius,
        TableField::LegBottomRadius,
        TableField::LegTiltAngleDeg,
        TableField::TopThickness,
        TableField::RoundedCornerPercent,
        TableField::Material,
        TableField::PlasticColor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TableField::Width => "width",
            TableField::Length => "length",
            TableField::LegHeight => "leg_height",
            TableField::LegTopRadius => "leg_top_radius",
            TableField::LegBottomRadius => "leg_bottom_radius",
            TableField::LegTiltAngleDeg => "leg_tilt_angle_deg",
            TableField::TopThickness => "top_thickness",
            TableField::RoundedCornerPercent => "rounded_corner_percent",
            TableField::Material => "material",
            TableField::PlasticColor => "plastic_color",
        }
    }

    /// Range of a scalar field; `None` for material and colour.
    pub fn spec(&self) -> Option<FieldSpec> {
        match self {
            TableField::Width => Some(limits::WIDTH),
            TableField::Length => Some(limits::LENGTH),
            TableField::LegHeight => Some(limits::LEG_HEIGHT),
            TableField::LegTopRadius => Some(limits::LEG_TOP_RADIUS),
            TableField::LegBottomRadius => Some(limits::LEG_BOTTOM_RADIUS),
            TableField::LegTiltAngleDeg => Some(limits::LEG_TILT_ANGLE_DEG),
            TableField::TopThickness => Some(limits::TOP_THICKNESS),
            TableField::RoundedCornerPercent => Some(limits::ROUNDED_CORNER_PERCENT),
            TableField::Material | TableField::PlasticColor => None,
        }
    }
}

impl fmt::Display for TableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableField {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Also accepts the names used by the first web configurator.
        match normalize_field_name(s).as_str() {
            "width" | "tablewidth" => Ok(TableField::Width),
            "length" | "tablelength" => Ok(TableField::Length),
            "legheight" => Ok(TableField::LegHeight),
            "legtopradius" | "legwidth" => Ok(TableField::LegTopRadius),
            "legbottomradius" | "legminwidth" => Ok(TableField::LegBottomRadius),
            "legtiltangledeg" | "legtiltangle" | "legtilt" => Ok(TableField::LegTiltAngleDeg),
            "topthickness" | "tablethickness" | "thickness" => Ok(TableField::TopThickness),
            "roundedcornerpercent" | "roundedcorners" => Ok(TableField::RoundedCornerPercent),
            "material" => Ok(TableField::Material),
            "plasticcolor" | "color" => Ok(TableField::PlasticColor),
            _ => Err(ParamError::InvalidField {
                name: s.to_string(),
            }),
        }
    }
}

impl TableParameters {
    fn scalar_mut(&mut self, field: TableField) -> Option<&mut f64> {
        match field {
            TableField::Width => Some(&mut self.width),
            TableField::Length => Some(&mut self.length),
            TableField::LegHeight => Some(&mut self.leg_height),
            TableField::LegTopRadius => Some(&mut self.leg_top_radius),
            TableField::LegBottomRadius => Some(&mut self.leg_bottom_radius),
            TableField::LegTiltAngleDeg => Some(&mut self.leg_tilt_angle_deg),
            TableField::TopThickness => Some(&mut self.top_thickness),
            TableField::RoundedCornerPercent => Some(&mut self.rounded_corner_percent),
            TableField::Material | TableField::PlasticColor => None,
        }
    }

    fn scalar(&self, field: TableField) -> Option<f64> {
        match field {
            TableField::Width => Some(self.width),
            TableField::Length => Some(self.length),
            TableField::LegHeight => Some(self.leg_height),
            TableField::LegTopRadius => Some(self.leg_top_radius),
            TableField::LegBottomRadius => Some(self.leg_bottom_radius),
            TableField::LegTiltAngleDeg => Some(self.leg_tilt_angle_deg),
            TableField::TopThickness => Some(self.top_thickness),
            TableField::RoundedCornerPercent => Some(self.rounded_corner_percent),
            TableField::Material | TableField::PlasticColor => None,
        }
    }
}

impl DesignParameters for TableParameters {
    type Field = TableField;

    const KIND: FurnitureKind = FurnitureKind::Table;

    fn fields() -> &'static [TableField] {
        &TableField::ALL
    }

    fn get(&self, field: TableField) -> ParamValue {
        match field {
            TableField::Material => ParamValue::Text(self.material.name().to_string()),
            TableField::PlasticColor => ParamValue::Text(self.plastic_color.to_hex()),
            scalar => ParamValue::Number(self.scalar(scalar).unwrap_or_default()),
        }
    }

    fn set(&mut self, field: TableField, value: &ParamValue) -> Result<(), ParamError> {
        match field {
            TableField::Material => self.material = value.parse_as(field)?,
            TableField::PlasticColor => self.plastic_color = value.parse_as(field)?,
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
        for field in TableField::ALL {
            if let (Some(spec), Some(slot)) = (field.spec(), self.scalar_mut(field)) {
                sanitize(slot, spec);
            }
        }
    }

    fn is_within_ranges(&self) -> bool {
        TableField::ALL.iter().all(|field| match (field.spec(), self.scalar(*field)) {
            (Some(spec), Some(value)) => spec.contains(value),
            _ => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let params = TableParameters::default();
        assert!(params.is_within_ranges());
        assert_eq!(params.width, 60.0);
        assert_eq!(params.length, 120.0);
        assert_eq!(params.material, Material::StainlessSteel);
    }

    #[test]
    fn test_rounded_corners_clamp_to_95() {
        let mut params = TableParameters::default();
        params
            .update("roundedCornerPercent", &ParamValue::Number(150.0))
            .unwrap();
        assert_eq!(params.rounded_corner_percent, 95.0);
    }

    #[test]
    fn test_unknown_field_is_rejected_without_change() {
        let mut params = TableParameters::default();
        let err = params
            .update("drawerCount", &ParamValue::Number(3.0))
            .unwrap_err();
        assert!(matches!(err, ParamError::InvalidField { .. }));
        assert_eq!(params, TableParameters::default());
    }

    #[test]
    fn test_legacy_names_map_to_fields() {
        assert_eq!("tableWidth".parse::<TableField>(), Ok(TableField::Width));
        assert_eq!("legWidth".parse::<TableField>(), Ok(TableField::LegTopRadius));
        assert_eq!("legMinWidth".parse::<TableField>(), Ok(TableField::LegBottomRadius));
        assert_eq!("roundedCorners".parse::<TableField>(), Ok(TableField::RoundedCornerPercent));
        assert_eq!("leg_tilt_angle_deg".parse::<TableField>(), Ok(TableField::LegTiltAngleDeg));
    }

    #[test]
    fn test_non_finite_value_leaves_field_unchanged() {
        let mut params = TableParameters::default();
        let err = params.set(TableField::Width, &ParamValue::Number(f64::NAN));
        assert!(err.is_err());
        assert_eq!(params.width, 60.0);
    }

    #[test]
    fn test_plastic_color_survives_material_round_trip() {
        let mut params = TableParameters::default();
        params.update("material", &"plastic".into()).unwrap();
        params.update("plasticColor", &"#FF8800".into()).unwrap();
        params.update("material", &"bronze".into()).unwrap();
        assert_eq!(params.plastic_color, Rgb::new(0xFF, 0x88, 0x00));
        params.update("material", &"plastic".into()).unwrap();
        assert_eq!(params.material(), Material::Plastic);
        assert_eq!(params.plastic_color(), Rgb::new(0xFF, 0x88, 0x00));
    }

    #[test]
    fn test_get_reports_current_values() {
        let mut params = TableParameters::default();
        params.set(TableField::LegHeight, &"82cm".into()).unwrap();
        assert_eq!(params.get(TableField::LegHeight), ParamValue::Number(82.0));
        assert_eq!(
            params.get(TableField::Material),
            ParamValue::Text("stainless_steel".to_string())
        );
    }

    #[test]
    fn test_sanitize_repairs_foreign_values() {
        let mut params = TableParameters {
            width: 500.0,
            leg_top_radius: f64::NAN,
            ..TableParameters::default()
        };
        assert!(!params.is_within_ranges());
        params.sanitize();
        assert_eq!(params.width, 120.0);
        assert_eq!(params.leg_top_radius, 4.0);
        assert!(params.is_within_ranges());
    }
}
