use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::vector::Vec3;

/// A point in 3D space. Y is up; the floor is the plane y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        *self + (*other - *self) * 0.5
    }

    /// Drop the height, keeping the floor-plan coordinates (x, z).
    pub fn plan(&self) -> Point2d {
        Point2d::new(self.x, self.z)
    }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.z].iter().all(|c| c.is_finite())
    }
}

impl Add<Vec3> for Point3d {
    type Output = Point3d;
    fn add(self, rhs: Vec3) -> Self::Output {
        Point3d::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3d {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// A point in the floor plan: `x` across the width, `y` along the length
/// (world z).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point on a circle of `radius` around `self` at `angle` radians.
    pub fn polar_offset(&self, radius: f64, angle: f64) -> Self {
        Self::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Lift into 3D at height `y`.
    pub fn at_height(&self, y: f64) -> Point3d {
        Point3d::new(self.x, y, self.y)
    }
}
