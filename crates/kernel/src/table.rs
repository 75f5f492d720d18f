use design_types::{FurnitureKind, TableParameters};
use tracing::instrument;

use crate::legs::{place_legs, LegSpec, TABLE_LEG_INSET_RATIO};
use crate::model::FurnitureModel;
use crate::plate::build_top_plate;

/// Build the table solid: a plate resting on four legs.
///
/// Total over the clamped parameter domain; does not re-validate ranges.
#[instrument(skip(params), fields(width = params.width, length = params.length))]
pub fn build_table(params: &TableParameters) -> FurnitureModel {
    let top = build_top_plate(
        params.width,
        params.length,
        params.top_thickness,
        params.rounded_corner_percent,
        params.leg_height,
    );
    let (half_width, half_length) = top.half_extents();
    let legs = place_legs(
        half_width,
        half_length,
        TABLE_LEG_INSET_RATIO,
        LegSpec {
            top_radius: params.leg_top_radius,
            bottom_radius: params.leg_bottom_radius,
            height: params.leg_height,
            tilt_deg: params.leg_tilt_angle_deg,
        },
    );

    FurnitureModel {
        kind: FurnitureKind::Table,
        top,
        legs: legs.to_vec(),
        panels: Vec::new(),
    }
}
