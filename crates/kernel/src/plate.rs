//! Rectangular and rounded top plates.
//!
//! A plate is a closed outline in the floor plan extruded upward by its
//! thickness. Below the rounding threshold the outline is a plain rectangle;
//! above it, each corner is replaced by a quarter circle whose radius is a
//! fraction of half the short side, capped below 100% so that opposing arcs
//! can never meet.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::geometry::{BoundingBox, Point2d, Point3d};

/// Rounding percentages below this produce a plain rectangular prism.
pub const ROUNDING_THRESHOLD_PERCENT: f64 = 5.0;

/// Largest fraction of half the short side a corner radius may take.
pub const ROUNDING_CAP: f64 = 0.95;

/// Outline of a plate in the floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlateProfile {
    Rectangle,
    Rounded { radius: f64 },
}

/// A horizontal slab: the table top or a chair seat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopPlate {
    /// Extent along x.
    pub width: f64,
    /// Extent along z.
    pub length: f64,
    pub thickness: f64,
    /// Height of the underside above the floor.
    pub elevation: f64,
    pub profile: PlateProfile,
}

/// Corner radius for a `width` x `length` plate rounded by `percent`.
///
/// Returns `None` on the rectangular path. The result never exceeds
/// `ROUNDING_CAP * min(width, length) / 2`.
pub fn corner_radius(width: f64, length: f64, percent: f64) -> Option<f64> {
    if percent < ROUNDING_THRESHOLD_PERCENT {
        return None;
    }
    let short_side = width.min(length);
    let fraction = (percent / 100.0).min(ROUNDING_CAP);
    Some(short_side / 2.0 * fraction)
}

impl TopPlate {
    /// Plain rectangular slab.
    pub fn rectangle(width: f64, length: f64, thickness: f64, elevation: f64) -> Self {
        Self {
            width,
            length,
            thickness,
            elevation,
            profile: PlateProfile::Rectangle,
        }
    }

    pub fn corner_radius(&self) -> f64 {
        match self.profile {
            PlateProfile::Rectangle => 0.0,
            PlateProfile::Rounded { radius } => radius,
        }
    }

    pub fn half_extents(&self) -> (f64, f64) {
        (self.width / 2.0, self.length / 2.0)
    }

    /// Height of the upper face.
    pub fn top_elevation(&self) -> f64 {
        self.elevation + self.thickness
    }

    /// Centres of the four corner arcs, from the bottom-right corner onward.
    pub fn corner_centers(&self) -> [Point2d; 4] {
        let (hw, hl) = self.half_extents();
        let r = self.corner_radius();
        let (cx, cz) = (hw - r, hl - r);
        [
            Point2d::new(cx, -cz),
            Point2d::new(cx, cz),
            Point2d::new(-cx, cz),
            Point2d::new(-cx, -cz),
        ]
    }

    /// Midpoints of the four straight edges (front, right, back, left).
    pub fn edge_midpoints(&self) -> [Point2d; 4] {
        let (hw, hl) = self.half_extents();
        [
            Point2d::new(0.0, -hl),
            Point2d::new(hw, 0.0),
            Point2d::new(0.0, hl),
            Point2d::new(-hw, 0.0),
        ]
    }

    /// Closed outline with each corner arc split into `arc_segments` chords.
    ///
    /// Traced with increasing angle about the centre, starting at the left
    /// end of the front edge `(-(w/2 - r), -l/2)`, so the front edge is the
    /// first segment. The last chord of the bottom-left arc closes the loop.
    pub fn outline(&self, arc_segments: usize) -> Vec<Point2d> {
        let (hw, hl) = self.half_extents();
        match self.profile {
            PlateProfile::Rectangle => vec![
                Point2d::new(-hw, -hl),
                Point2d::new(hw, -hl),
                Point2d::new(hw, hl),
                Point2d::new(-hw, hl),
            ],
            PlateProfile::Rounded { radius } => {
                let segments = arc_segments.max(1);
                let mut points = Vec::with_capacity(4 * (segments + 1));
                for (quadrant, center) in self.corner_centers().iter().enumerate() {
                    // Bottom-right arc sweeps 270..360 degrees, then each
                    // following corner advances by a quarter turn.
                    let start = 1.5 * PI + quadrant as f64 * FRAC_PI_2;
                    for k in 0..=segments {
                        let angle = start + FRAC_PI_2 * k as f64 / segments as f64;
                        points.push(center.polar_offset(radius, angle));
                    }
                }
                // The bottom-left arc ends where the front edge begins.
                points.rotate_right(1);
                points
            }
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let (hw, hl) = self.half_extents();
        BoundingBox::from_points(&[
            Point3d::new(-hw, self.elevation, -hl),
            Point3d::new(hw, self.top_elevation(), hl),
        ])
    }
}

/// Build the top plate for the given dimensions.
#[instrument]
pub fn build_top_plate(
    width: f64,
    length: f64,
    thickness: f64,
    rounded_percent: f64,
    elevation: f64,
) -> TopPlate {
    let profile = match corner_radius(width, length, rounded_percent) {
        Some(radius) => PlateProfile::Rounded { radius },
        None => PlateProfile::Rectangle,
    };
    debug!(?profile, "top plate profile");
    TopPlate {
        width,
        length,
        thickness,
        elevation,
        profile,
    }
}
