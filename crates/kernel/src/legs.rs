//! Leg placement under a plate.
//!
//! Legs hang from four anchors inset from the plate's half extents. A tilt
//! angle moves each foot toward the plate centre on x and z independently;
//! the leg is a frustum whose centerline joins the anchor to the foot.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::geometry::{Point2d, Point3d, Transform, Vec3};

/// Fraction of the table's half extents at which legs are anchored.
pub const TABLE_LEG_INSET_RATIO: f64 = 0.65;

/// Shape of one leg before placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegSpec {
    pub top_radius: f64,
    pub bottom_radius: f64,
    /// Vertical distance from the floor to the anchor.
    pub height: f64,
    pub tilt_deg: f64,
}

/// A placed frustum leg, as consumed by the render adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegPlacement {
    /// Anchor under the plate.
    pub top: Point3d,
    /// Foot on the floor.
    pub bottom: Point3d,
    /// Midpoint of the centerline.
    pub position: Point3d,
    /// XYZ Euler angles (radians) that turn a +Y-aligned leg onto the
    /// centerline. The Y component is always zero.
    pub rotation: [f64; 3],
    /// Angle between the centerline and the vertical.
    pub tilt: f64,
    /// Direction of the foot offset in the floor plan, `atan2(dz, dx)`.
    pub heading: f64,
    pub top_radius: f64,
    pub bottom_radius: f64,
    /// Vertical span.
    pub height: f64,
    /// Centerline length; equals `height` for an untilted leg.
    pub length: f64,
}

impl LegPlacement {
    /// Unit vector from foot to anchor.
    pub fn axis(&self) -> Vec3 {
        (self.top - self.bottom) / self.length
    }

    /// Maps a leg modelled along +Y and centred at the origin into place.
    pub fn transform(&self) -> Transform {
        Transform::placement(&self.position, self.rotation)
    }

    /// Foot displacement relative to the anchor, in the floor plan.
    pub fn horizontal_offset(&self) -> (f64, f64) {
        (self.bottom.x - self.top.x, self.bottom.z - self.top.z)
    }

    pub fn is_cylinder(&self) -> bool {
        self.top_radius == self.bottom_radius
    }

    pub fn is_finite(&self) -> bool {
        self.top.is_finite()
            && self.bottom.is_finite()
            && self.position.is_finite()
            && self.rotation.iter().all(|a| a.is_finite())
            && self.tilt.is_finite()
            && self.heading.is_finite()
            && self.length.is_finite()
    }
}

/// The four anchor points, ordered (-x,-z), (-x,+z), (+x,-z), (+x,+z).
pub fn leg_anchors(half_width: f64, half_length: f64, inset_ratio: f64) -> [Point2d; 4] {
    let ix = half_width * inset_ratio;
    let iz = half_length * inset_ratio;
    [
        Point2d::new(-ix, -iz),
        Point2d::new(-ix, iz),
        Point2d::new(ix, -iz),
        Point2d::new(ix, iz),
    ]
}

/// Foot offset for an anchor at `(x, z)`: `sin(tilt) * height`, pointing
/// toward the centre on each axis.
pub fn tilt_offset(x: f64, z: f64, tilt_deg: f64, height: f64) -> (f64, f64) {
    let offset = tilt_deg.to_radians().sin() * height;
    (-x.signum() * offset, -z.signum() * offset)
}

/// Place a single leg hanging from `anchor` at height `spec.height`.
pub fn place_leg(anchor: Point2d, spec: &LegSpec) -> LegPlacement {
    let (dx, dz) = tilt_offset(anchor.x, anchor.y, spec.tilt_deg, spec.height);
    let top = anchor.at_height(spec.height);
    let bottom = Point3d::new(anchor.x + dx, 0.0, anchor.y + dz);

    let horizontal = dx.hypot(dz);
    let length = horizontal.hypot(spec.height);

    // Rx(rx) * Rz(rz) applied to +Y must give (-dx, h, -dz) / length.
    let rx = (-dz).atan2(spec.height);
    let rz = dx.atan2(dz.hypot(spec.height));

    LegPlacement {
        top,
        bottom,
        position: top.midpoint(&bottom),
        rotation: [rx, 0.0, rz],
        tilt: horizontal.atan2(spec.height),
        heading: dz.atan2(dx),
        top_radius: spec.top_radius,
        bottom_radius: spec.bottom_radius,
        height: spec.height,
        length,
    }
}

/// Place four legs under a plate of the given half extents.
#[instrument]
pub fn place_legs(
    half_width: f64,
    half_length: f64,
    inset_ratio: f64,
    spec: LegSpec,
) -> [LegPlacement; 4] {
    let legs = leg_anchors(half_width, half_length, inset_ratio).map(|a| place_leg(a, &spec));
    debug!(
        tilt = legs[0].tilt,
        offset = ?legs[0].horizontal_offset(),
        "legs placed"
    );
    legs
}
