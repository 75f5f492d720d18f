use design_types::{ChairParameters, FurnitureKind, TableParameters};
use serde::{Deserialize, Serialize};

use crate::chair::{build_chair, Panel};
use crate::geometry::{BoundingBox, Point3d};
use crate::legs::LegPlacement;
use crate::plate::TopPlate;
use crate::table::build_table;

/// Exact geometry of one piece of furniture, in centimetres with Y up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureModel {
    pub kind: FurnitureKind,
    /// Table top or chair seat.
    pub top: TopPlate,
    pub legs: Vec<LegPlacement>,
    /// Extra boards such as a backrest.
    pub panels: Vec<Panel>,
}

impl FurnitureModel {
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = self.top.bounding_box();
        for leg in &self.legs {
            bb.expand_to_include(&leg.top);
            bb.expand_to_include(&leg.bottom);
        }
        for panel in &self.panels {
            let t = panel.transform();
            let (hx, hy, hz) = (panel.width / 2.0, panel.height / 2.0, panel.thickness / 2.0);
            for sx in [-hx, hx] {
                for sy in [-hy, hy] {
                    for sz in [-hz, hz] {
                        bb.expand_to_include(&t.transform_point(&Point3d::new(sx, sy, sz)));
                    }
                }
            }
        }
        bb
    }

    /// True when no coordinate anywhere in the model is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        let top_ok = [
            self.top.width,
            self.top.length,
            self.top.thickness,
            self.top.elevation,
            self.top.corner_radius(),
        ]
        .iter()
        .all(|v| v.is_finite());
        let panels_ok = self
            .panels
            .iter()
            .all(|p| p.position.is_finite() && p.rotation.iter().all(|a| a.is_finite()));
        top_ok && panels_ok && self.legs.iter().all(LegPlacement::is_finite)
    }
}

/// Parameter records that can be turned into geometry.
pub trait BuildModel {
    fn build_model(&self) -> FurnitureModel;
}

impl BuildModel for TableParameters {
    fn build_model(&self) -> FurnitureModel {
        build_table(self)
    }
}

impl BuildModel for ChairParameters {
    fn build_model(&self) -> FurnitureModel {
        build_chair(self)
    }
}

/// Single-entry memo keyed by the full parameter snapshot.
#[derive(Debug, Clone)]
pub struct ModelCache<P> {
    entry: Option<(P, FurnitureModel)>,
    hits: u64,
    misses: u64,
}

impl<P: BuildModel + Clone + PartialEq> ModelCache<P> {
    pub fn new() -> Self {
        Self {
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the model for `params`, rebuilding only when they changed.
    pub fn get(&mut self, params: &P) -> &FurnitureModel {
        let fresh = matches!(&self.entry, Some((key, _)) if key == params);
        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.entry = None;
        }
        let (_, model) = self
            .entry
            .get_or_insert_with(|| (params.clone(), params.build_model()));
        model
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl<P: BuildModel + Clone + PartialEq> Default for ModelCache<P> {
    fn default() -> Self {
        Self::new()
    }
}
