//! Triangle meshes for furniture models.
//!
//! Plates are extruded outlines, legs are frustums built along +Y and moved
//! into place by their placement transform, panels are boxes.

pub mod config;
pub mod mesh;

use std::f64::consts::TAU;

use furniture_kernel::{FurnitureModel, LegPlacement, Panel, Point2d, Point3d, TopPlate, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use config::MeshConfig;
pub use mesh::TriangleMesh;

/// All meshes of one model, kept per part so a renderer can place them
/// independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FurnitureMesh {
    pub top: TriangleMesh,
    pub legs: Vec<TriangleMesh>,
    pub panels: Vec<TriangleMesh>,
}

impl FurnitureMesh {
    /// Every part merged into one mesh.
    pub fn combined(&self) -> TriangleMesh {
        let mut mesh = self.top.clone();
        for part in self.legs.iter().chain(&self.panels) {
            mesh.merge(part);
        }
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.top.triangle_count()
            + self
                .legs
                .iter()
                .chain(&self.panels)
                .map(TriangleMesh::triangle_count)
                .sum::<usize>()
    }
}

/// Extrude the plate outline between its underside and top face.
///
/// Caps are fans from the plate centre, which is valid because the outline
/// is convex. Side quads are flat shaded.
pub fn tessellate_plate(plate: &TopPlate, config: &MeshConfig) -> TriangleMesh {
    let config = config.sanitized();
    let outline = plate.outline(config.arc_segments);
    let (bottom_y, top_y) = (plate.elevation, plate.top_elevation());
    let mut mesh = TriangleMesh::new();

    // Outline angles increase from +x toward +z, which is clockwise seen
    // from above, so the top fan is emitted in reverse.
    let top_center = mesh.add_vertex(Point3d::new(0.0, top_y, 0.0), Vec3::Y);
    let top_ring: Vec<u32> = outline
        .iter()
        .map(|p| mesh.add_vertex(p.at_height(top_y), Vec3::Y))
        .collect();
    fan(&mut mesh, top_center, &top_ring, true);

    let bottom_center = mesh.add_vertex(Point3d::new(0.0, bottom_y, 0.0), -Vec3::Y);
    let bottom_ring: Vec<u32> = outline
        .iter()
        .map(|p| mesh.add_vertex(p.at_height(bottom_y), -Vec3::Y))
        .collect();
    fan(&mut mesh, bottom_center, &bottom_ring, false);

    for (i, a) in outline.iter().enumerate() {
        let b = &outline[(i + 1) % outline.len()];
        if a.distance_to(b) <= f64::EPSILON {
            continue;
        }
        mesh.add_quad(
            [
                a.at_height(bottom_y),
                b.at_height(bottom_y),
                b.at_height(top_y),
                a.at_height(top_y),
            ],
            edge_normal(a, b),
        );
    }
    mesh
}

/// Closed fan over `ring`; `reverse` flips the winding.
fn fan(mesh: &mut TriangleMesh, center: u32, ring: &[u32], reverse: bool) {
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[(i + 1) % ring.len()]);
        if reverse {
            mesh.add_triangle(center, b, a);
        } else {
            mesh.add_triangle(center, a, b);
        }
    }
}

/// Outward normal of an outline edge traced with increasing angle.
fn edge_normal(a: &Point2d, b: &Point2d) -> Vec3 {
    let (dx, dz) = (b.x - a.x, b.y - a.y);
    Vec3::new(dz, 0.0, -dx).normalized().unwrap_or(Vec3::X)
}

/// A capped frustum along +Y, centred at the origin, `length` tall.
pub fn frustum(top_radius: f64, bottom_radius: f64, length: f64, segments: usize) -> TriangleMesh {
    let segments = segments.max(3);
    let (y0, y1) = (-length / 2.0, length / 2.0);
    let slope = if length > 0.0 {
        (bottom_radius - top_radius) / length
    } else {
        0.0
    };
    let mut mesh = TriangleMesh::new();

    let ring = |radius: f64, y: f64, k: usize| {
        let angle = TAU * k as f64 / segments as f64;
        Point3d::new(radius * angle.cos(), y, radius * angle.sin())
    };

    // Smooth side: one column of vertices per facet edge, seam duplicated.
    let mut columns = Vec::with_capacity(segments + 1);
    for k in 0..=segments {
        let angle = TAU * k as f64 / segments as f64;
        let normal = Vec3::new(angle.cos(), slope, angle.sin())
            .normalized()
            .unwrap_or(Vec3::X);
        let bottom = mesh.add_vertex(ring(bottom_radius, y0, k), normal);
        let top = mesh.add_vertex(ring(top_radius, y1, k), normal);
        columns.push((bottom, top));
    }
    for k in 0..segments {
        let (b0, t0) = columns[k];
        let (b1, t1) = columns[k + 1];
        mesh.add_triangle(b0, t1, b1);
        mesh.add_triangle(b0, t0, t1);
    }

    let top_center = mesh.add_vertex(Point3d::new(0.0, y1, 0.0), Vec3::Y);
    let top_ring: Vec<u32> = (0..segments)
        .map(|k| mesh.add_vertex(ring(top_radius, y1, k), Vec3::Y))
        .collect();
    fan(&mut mesh, top_center, &top_ring, true);

    let bottom_center = mesh.add_vertex(Point3d::new(0.0, y0, 0.0), -Vec3::Y);
    let bottom_ring: Vec<u32> = (0..segments)
        .map(|k| mesh.add_vertex(ring(bottom_radius, y0, k), -Vec3::Y))
        .collect();
    fan(&mut mesh, bottom_center, &bottom_ring, false);

    mesh
}

/// Frustum for a placed leg, in world coordinates.
pub fn tessellate_leg(leg: &LegPlacement, config: &MeshConfig) -> TriangleMesh {
    let mut mesh = frustum(
        leg.top_radius,
        leg.bottom_radius,
        leg.length,
        config.sanitized().radial_segments,
    );
    mesh.transform(&leg.transform());
    mesh
}

/// An axis-aligned box of the given extents, centred at the origin.
pub fn cuboid(width: f64, height: f64, depth: f64) -> TriangleMesh {
    let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
    let p = Point3d::new;
    let mut mesh = TriangleMesh::new();
    mesh.add_quad([p(hx, -hy, -hz), p(hx, hy, -hz), p(hx, hy, hz), p(hx, -hy, hz)], Vec3::X);
    mesh.add_quad([p(-hx, -hy, -hz), p(-hx, hy, -hz), p(-hx, hy, hz), p(-hx, -hy, hz)], -Vec3::X);
    mesh.add_quad([p(-hx, hy, -hz), p(hx, hy, -hz), p(hx, hy, hz), p(-hx, hy, hz)], Vec3::Y);
    mesh.add_quad([p(-hx, -hy, -hz), p(hx, -hy, -hz), p(hx, -hy, hz), p(-hx, -hy, hz)], -Vec3::Y);
    mesh.add_quad([p(-hx, -hy, hz), p(hx, -hy, hz), p(hx, hy, hz), p(-hx, hy, hz)], Vec3::Z);
    mesh.add_quad([p(-hx, -hy, -hz), p(hx, -hy, -hz), p(hx, hy, -hz), p(-hx, hy, -hz)], -Vec3::Z);
    mesh
}

pub fn tessellate_panel(panel: &Panel) -> TriangleMesh {
    let mut mesh = cuboid(panel.width, panel.height, panel.thickness);
    mesh.transform(&panel.transform());
    mesh
}

/// Tessellate every part of a model.
#[instrument(skip(model), fields(kind = %model.kind, legs = model.legs.len()))]
pub fn tessellate_model(model: &FurnitureModel, config: &MeshConfig) -> FurnitureMesh {
    let mesh = FurnitureMesh {
        top: tessellate_plate(&model.top, config),
        legs: model.legs.iter().map(|leg| tessellate_leg(leg, config)).collect(),
        panels: model.panels.iter().map(tessellate_panel).collect(),
    };
    debug!(triangles = mesh.triangle_count(), "tessellated model");
    mesh
}
