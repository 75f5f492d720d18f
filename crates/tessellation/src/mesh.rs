use furniture_kernel::{Point3d, Transform, Vec3};
use serde::{Deserialize, Serialize};

/// A triangle mesh for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...], counter-clockwise seen from outside.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn add_vertex(&mut self, pos: Point3d, normal: Vec3) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.push(pos.x as f32);
        self.positions.push(pos.y as f32);
        self.positions.push(pos.z as f32);
        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a flat quad facing `normal`; corners may be given in either winding.
    pub fn add_quad(&mut self, corners: [Point3d; 4], normal: Vec3) {
        let [a, b, c, d] = corners;
        let facing = (b - a).cross(&(c - a)).dot(&normal);
        let ordered = if facing < 0.0 { [a, d, c, b] } else { [a, b, c, d] };
        let base: Vec<u32> = ordered
            .iter()
            .map(|p| self.add_vertex(*p, normal))
            .collect();
        self.add_triangle(base[0], base[1], base[2]);
        self.add_triangle(base[0], base[2], base[3]);
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        for &idx in &other.indices {
            self.indices.push(idx + offset);
        }
    }

    /// Apply a rigid placement to every vertex and normal.
    pub fn transform(&mut self, t: &Transform) {
        for chunk in self.positions.chunks_exact_mut(3) {
            let p = t.transform_point(&Point3d::new(
                chunk[0] as f64,
                chunk[1] as f64,
                chunk[2] as f64,
            ));
            chunk.copy_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }
        for chunk in self.normals.chunks_exact_mut(3) {
            let n = t.transform_vector(&Vec3::new(
                chunk[0] as f64,
                chunk[1] as f64,
                chunk[2] as f64,
            ));
            chunk.copy_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
        }
    }

    /// Axis-aligned bounds of the vertex positions as `(min, max)`.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut iter = self.positions.chunks_exact(3);
        let first = iter.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for chunk in iter {
            for axis in 0..3 {
                min[axis] = min[axis].min(chunk[axis]);
                max[axis] = max[axis].max(chunk[axis]);
            }
        }
        Some((min, max))
    }

    /// Sum of signed tetrahedron volumes; positive for a closed outward-wound mesh.
    pub fn signed_volume(&self) -> f64 {
        let vertex = |i: u32| {
            let i = i as usize * 3;
            Vec3::new(
                self.positions[i] as f64,
                self.positions[i + 1] as f64,
                self.positions[i + 2] as f64,
            )
        };
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let (a, b, c) = (vertex(tri[0]), vertex(tri[1]), vertex(tri[2]));
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_quad_faces_normal() {
        let mut mesh = TriangleMesh::new();
        // Clockwise when seen from +Y; add_quad must flip it.
        mesh.add_quad(
            [
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 1.0),
                Point3d::new(0.0, 0.0, 1.0),
            ],
            Vec3::Y,
        );
        assert_eq!(mesh.triangle_count(), 2);
        let p = |i: u32| {
            let i = i as usize * 3;
            Point3d::new(
                mesh.positions[i] as f64,
                mesh.positions[i + 1] as f64,
                mesh.positions[i + 2] as f64,
            )
        };
        let (a, b, c) = (p(mesh.indices[0]), p(mesh.indices[1]), p(mesh.indices[2]));
        assert!((b - a).cross(&(c - a)).dot(&Vec3::Y) > 0.0);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = TriangleMesh::new();
        let i0 = a.add_vertex(Point3d::ORIGIN, Vec3::Y);
        let i1 = a.add_vertex(Point3d::new(1.0, 0.0, 0.0), Vec3::Y);
        let i2 = a.add_vertex(Point3d::new(0.0, 0.0, 1.0), Vec3::Y);
        a.add_triangle(i0, i1, i2);
        let b = a.clone();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(&a.indices[3..], &[3, 4, 5]);
    }

    #[test]
    fn test_transform_translates_positions_only() {
        let mut mesh = TriangleMesh::new();
        mesh.add_vertex(Point3d::ORIGIN, Vec3::Y);
        mesh.transform(&Transform::translation(1.0, 2.0, 3.0));
        assert_eq!(mesh.positions, vec![1.0, 2.0, 3.0]);
        assert_eq!(mesh.normals, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_bounds_of_empty_mesh() {
        assert!(TriangleMesh::new().bounds().is_none());
    }
}
