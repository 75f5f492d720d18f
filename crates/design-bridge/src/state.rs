use design_engine::{DesignStore, EngineConfig, Furniture, SuggestionTracker};
use uuid::Uuid;

use crate::frame::{FrameCache, RenderFrame};

/// The engine state behind the message bridge.
///
/// Holds the design store, the assistant conversation and the per-snapshot
/// render caches.
pub struct BridgeState<F: Furniture> {
    pub store: DesignStore<F>,
    pub suggestions: SuggestionTracker,
    frames: FrameCache<F>,
}

impl<F: Furniture> BridgeState<F> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(DesignStore::new(config))
    }

    pub fn with_store(store: DesignStore<F>) -> Self {
        Self {
            store,
            suggestions: SuggestionTracker::new(),
            frames: FrameCache::new(),
        }
    }

    /// The render frame for the current parameters, rebuilt only when they
    /// changed since the last request.
    pub fn frame(&mut self) -> &RenderFrame {
        let params = self.store.parameters();
        let mesh = self.store.config().mesh;
        self.frames
            .get_or_build(params, || RenderFrame::build(params, &params.build_model(), &mesh))
    }

    /// Number of frames built so far.
    pub fn frame_builds(&self) -> u64 {
        self.frames.builds()
    }
}

/// Errors from the bridge layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    #[error("design not found: {id}")]
    DesignNotFound { id: Uuid },

    #[error("unknown suggestion: {id}")]
    UnknownSuggestion { id: Uuid },

    #[error("invalid design: {reason}")]
    InvalidDesign { reason: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}
