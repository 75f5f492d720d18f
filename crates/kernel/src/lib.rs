//! Parametric furniture geometry.
//!
//! Pure functions from a clamped parameter record to exact geometry: a top
//! plate outline and four placed frustum legs, plus a backrest for chairs.
//! All lengths are centimetres, Y is up and the floor is y = 0.

pub mod chair;
pub mod geometry;
pub mod legs;
pub mod model;
pub mod plate;
pub mod table;

pub use chair::{build_chair, Panel};
pub use geometry::{BoundingBox, Point2d, Point3d, Transform, Vec3};
pub use legs::{LegPlacement, LegSpec};
pub use model::{BuildModel, FurnitureModel, ModelCache};
pub use plate::{PlateProfile, TopPlate};
pub use table::build_table;
