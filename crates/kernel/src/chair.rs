use design_types::{ChairParameters, FurnitureKind, LegStyle};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::geometry::{Point3d, Transform};
use crate::legs::{place_legs, LegSpec};
use crate::model::FurnitureModel;
use crate::plate::TopPlate;

pub const SEAT_THICKNESS: f64 = 5.0;
pub const BACKREST_THICKNESS: f64 = 5.0;
/// Chair legs sit closer to the seat edge than table legs.
pub const CHAIR_LEG_INSET_RATIO: f64 = 0.8;

/// Leg dimensions implied by a chair's leg style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegProfile {
    pub top_radius: f64,
    pub bottom_radius: f64,
    pub splay_deg: f64,
}

pub fn leg_profile(style: LegStyle) -> LegProfile {
    match style {
        LegStyle::Modern => LegProfile {
            top_radius: 1.5,
            bottom_radius: 1.0,
            splay_deg: 4.0,
        },
        LegStyle::Classic => LegProfile {
            top_radius: 2.5,
            bottom_radius: 2.5,
            splay_deg: 0.0,
        },
        LegStyle::Industrial => LegProfile {
            top_radius: 2.0,
            bottom_radius: 2.0,
            splay_deg: 8.0,
        },
    }
}

/// A rectangular board placed by a rotation about its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Extent along local x.
    pub width: f64,
    /// Extent along local y.
    pub height: f64,
    /// Extent along local z.
    pub thickness: f64,
    pub position: Point3d,
    /// XYZ Euler angles in radians.
    pub rotation: [f64; 3],
}

impl Panel {
    pub fn transform(&self) -> Transform {
        Transform::placement(&self.position, self.rotation)
    }
}

/// Backrest hinged on the seat's rear edge, reclined by `angle_deg - 90`.
fn backrest(params: &ChairParameters) -> Panel {
    let recline = (params.backrest_angle - 90.0).to_radians();
    let half = params.backrest_height / 2.0;
    let hinge = Point3d::new(0.0, params.seat_height, -params.seat_depth / 2.0);
    Panel {
        width: params.seat_width,
        height: params.backrest_height,
        thickness: BACKREST_THICKNESS,
        position: Point3d::new(
            hinge.x,
            hinge.y + recline.cos() * half,
            hinge.z - recline.sin() * half,
        ),
        rotation: [-recline, 0.0, 0.0],
    }
}

/// Build the chair solid: seat, backrest and four legs.
#[instrument(skip(params), fields(style = %params.leg_style))]
pub fn build_chair(params: &ChairParameters) -> FurnitureModel {
    let seat = TopPlate::rectangle(
        params.seat_width,
        params.seat_depth,
        SEAT_THICKNESS,
        params.seat_height - SEAT_THICKNESS,
    );
    let profile = leg_profile(params.leg_style);
    let (half_width, half_depth) = seat.half_extents();
    let legs = place_legs(
        half_width,
        half_depth,
        CHAIR_LEG_INSET_RATIO,
        LegSpec {
            top_radius: profile.top_radius,
            bottom_radius: profile.bottom_radius,
            height: seat.elevation,
            tilt_deg: profile.splay_deg,
        },
    );

    FurnitureModel {
        kind: FurnitureKind::Chair,
        top: seat,
        legs: legs.to_vec(),
        panels: vec![backrest(params)],
    }
}
