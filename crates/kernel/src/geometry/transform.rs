use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// Affine 4x4 matrix, column-major, as uploaded to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub m: [f64; 16],
}

impl Transform {
    /// Matrix whose first three columns are the images of the unit axes and
    /// whose last column is the translation.
    fn from_columns(x: Vec3, y: Vec3, z: Vec3, origin: Vec3) -> Self {
        #[rustfmt::skip]
        let m = [
            x.x, x.y, x.z, 0.0,
            y.x, y.y, y.z, 0.0,
            z.x, z.y, z.z, 0.0,
            origin.x, origin.y, origin.z, 1.0,
        ];
        Self { m }
    }

    pub fn identity() -> Self {
        Self::from_columns(Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(0.0, 0.0, 0.0))
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::from_columns(Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(dx, dy, dz))
    }

    /// Right-handed rotation about +X by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_columns(
            Vec3::X,
            Vec3::new(0.0, c, s),
            Vec3::new(0.0, -s, c),
            Vec3::new(0.0, 0.0, 0.0),
        )
    }

    /// Right-handed rotation about +Y by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_columns(
            Vec3::new(c, 0.0, -s),
            Vec3::Y,
            Vec3::new(s, 0.0, c),
            Vec3::new(0.0, 0.0, 0.0),
        )
    }

    /// Right-handed rotation about +Z by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_columns(
            Vec3::new(c, s, 0.0),
            Vec3::new(-s, c, 0.0),
            Vec3::Z,
            Vec3::new(0.0, 0.0, 0.0),
        )
    }

    /// XYZ Euler rotation followed by a move to `position`.
    ///
    /// Equals `T · Rx · Ry · Rz`, so Z is applied to the geometry first.
    pub fn placement(position: &Point3d, rotation: [f64; 3]) -> Self {
        let [rx, ry, rz] = rotation;
        Self::translation(position.x, position.y, position.z)
            .then(&Self::rotation_x(rx))
            .then(&Self::rotation_y(ry))
            .then(&Self::rotation_z(rz))
    }

    fn entry(&self, row: usize, col: usize) -> f64 {
        self.m[col * 4 + row]
    }

    /// Apply the linear part only.
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        let row = |r| self.entry(r, 0) * v.x + self.entry(r, 1) * v.y + self.entry(r, 2) * v.z;
        Vec3::new(row(0), row(1), row(2))
    }

    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        let v = self.transform_vector(&Vec3::new(p.x, p.y, p.z));
        Point3d::new(
            v.x + self.entry(0, 3),
            v.y + self.entry(1, 3),
            v.z + self.entry(2, 3),
        )
    }

    /// `self * other`: `other` is applied first.
    pub fn then(&self, other: &Transform) -> Transform {
        let mut m = [0.0f64; 16];
        for (i, slot) in m.iter_mut().enumerate() {
            let (col, row) = (i / 4, i % 4);
            *slot = (0..4).map(|k| self.entry(row, k) * other.entry(k, col)).sum();
        }
        Transform { m }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Axis-aligned bounds in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    /// Inverted box that any point expands.
    pub fn empty() -> Self {
        Self {
            min: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3d>) -> Self {
        points.into_iter().fold(Self::empty(), |mut bb, p| {
            bb.expand_to_include(p);
            bb
        })
    }

    pub fn expand_to_include(&mut self, p: &Point3d) {
        self.min = Point3d::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3d::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}
