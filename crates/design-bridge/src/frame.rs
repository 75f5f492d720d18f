use design_engine::{Furniture, MaterialAttributes, Priced};
use design_types::DesignParameters;
use furniture_kernel::{FurnitureModel, LegPlacement};
use furniture_tessellation::{tessellate_model, MeshConfig, TriangleMesh};
use serde::{Deserialize, Serialize};

/// Everything the render adapter reads for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Table top or chair seat, in world coordinates.
    pub top_plate: TriangleMesh,
    /// Placements for adapters that instance their own leg geometry.
    pub legs: Vec<LegPlacement>,
    /// The same legs, already tessellated and placed.
    pub leg_meshes: Vec<TriangleMesh>,
    pub panels: Vec<TriangleMesh>,
    pub material: MaterialAttributes,
    pub price: u64,
}

impl RenderFrame {
    pub fn build<F: Furniture>(
        params: &F,
        model: &FurnitureModel,
        mesh: &MeshConfig,
    ) -> Self {
        let meshes = tessellate_model(model, mesh);
        Self {
            top_plate: meshes.top,
            legs: model.legs.clone(),
            leg_meshes: meshes.legs,
            panels: meshes.panels,
            material: design_engine::material::resolve(params.material(), params.plastic_color()),
            price: params.price(),
        }
    }
}

/// Last frame, keyed by the parameter snapshot it was built from.
#[derive(Debug, Clone, Default)]
pub struct FrameCache<P> {
    entry: Option<(P, RenderFrame)>,
    builds: u64,
}

impl<P: Furniture> FrameCache<P> {
    pub fn new() -> Self {
        Self {
            entry: None,
            builds: 0,
        }
    }

    /// Return the frame for `params`, building it with `build` on a miss.
    pub fn get_or_build(
        &mut self,
        params: &P,
        build: impl FnOnce() -> RenderFrame,
    ) -> &RenderFrame {
        if !matches!(&self.entry, Some((key, _)) if key == params) {
            self.builds += 1;
            self.entry = None;
        }
        let (_, frame) = self.entry.get_or_insert_with(|| (params.clone(), build()));
        frame
    }

    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
