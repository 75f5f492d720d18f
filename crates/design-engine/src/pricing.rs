//! Deterministic price derivation.
//!
//! Prices are whole currency units and never go below a per-family floor.
//! A table starts from a base, adds a weighted deviation per dimension from
//! its default and scales by a material multiplier. A chair starts from a
//! per-material base and adds a flat rate per centimetre of seat width, seat
//! height and backrest height above their minimums.

use design_types::{ChairParameters, Material, TableParameters};

/// Types with a derived price.
pub trait Priced {
    fn price(&self) -> u64;
}

pub fn material_multiplier(material: Material) -> f64 {
    match material {
        Material::Titanium => 1.8,
        Material::Bronze => 1.5,
        Material::StainlessSteel => 1.2,
        Material::Plastic => 0.8,
    }
}

fn finish(raw: f64, material: Material, floor: u64) -> u64 {
    let scaled = (raw * material_multiplier(material)).round();
    // Negative totals fall to the floor.
    if scaled > floor as f64 { scaled as u64 } else { floor }
}

pub mod table {
    pub const BASE: f64 = 10_000.0;
    pub const FLOOR: u64 = 5_000;
    pub const PER_WIDTH_CM: f64 = 200.0;
    pub const PER_LENGTH_CM: f64 = 150.0;
    pub const PER_LEG_HEIGHT_CM: f64 = 100.0;
    pub const PER_THICKNESS_CM: f64 = 500.0;
    pub const PER_TOP_RADIUS_CM: f64 = 200.0;
    pub const PER_BOTTOM_RADIUS_CM: f64 = 150.0;
    pub const PER_TILT_DEG: f64 = 50.0;
    pub const PER_ROUNDING_PERCENT: f64 = 30.0;
}

pub mod chair {
    use design_types::Material;

    /// Cheapest base price; no chair costs less.
    pub const FLOOR: u64 = 2_000;
    pub const PER_CM: f64 = 1.5;
    pub const SEAT_WIDTH_FROM: f64 = 40.0;
    pub const SEAT_HEIGHT_FROM: f64 = 40.0;
    pub const BACKREST_HEIGHT_FROM: f64 = 30.0;

    pub fn base(material: Material) -> f64 {
        match material {
            Material::Titanium => 8_000.0,
            Material::Bronze => 5_000.0,
            Material::StainlessSteel => 4_000.0,
            Material::Plastic => 2_000.0,
        }
    }
}

pub fn table_price(p: &TableParameters) -> u64 {
    use table::*;
    let raw = BASE
        + (p.width - 60.0) * PER_WIDTH_CM
        + (p.length - 120.0) * PER_LENGTH_CM
        + (p.leg_height - 75.0) * PER_LEG_HEIGHT_CM
        + (p.top_thickness - 3.0) * PER_THICKNESS_CM
        + (p.leg_top_radius - 4.0) * PER_TOP_RADIUS_CM
        + (p.leg_bottom_radius - 2.0) * PER_BOTTOM_RADIUS_CM
        + p.leg_tilt_angle_deg.abs() * PER_TILT_DEG
        + p.rounded_corner_percent * PER_ROUNDING_PERCENT;
    finish(raw, p.material, FLOOR)
}

/// Seat depth, recline and leg style do not affect a chair's price.
pub fn chair_price(p: &ChairParameters) -> u64 {
    use chair::*;
    let size_cm = (p.seat_width - SEAT_WIDTH_FROM)
        + (p.seat_height - SEAT_HEIGHT_FROM)
        + (p.backrest_height - BACKREST_HEIGHT_FROM);
    let raw = (base(p.material) + size_cm * PER_CM).round();
    if raw > FLOOR as f64 { raw as u64 } else { FLOOR }
}

impl Priced for TableParameters {
    fn price(&self) -> u64 {
        table_price(self)
    }
}

impl Priced for ChairParameters {
    fn price(&self) -> u64 {
        chair_price(self)
    }
}
