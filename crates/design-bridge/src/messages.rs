use design_engine::suggestion::SuggestionRequest;
use design_engine::{IgnoredChange, ParameterChange};
use design_types::{ParamValue, SavedDesign};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::frame::RenderFrame;

/// Messages from the UI (and the assistant glue) to the engine.
/// Serialized as JSON with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToEngine {
    // -- Parameters --
    /// Set one field; unknown names and bad values are ignored.
    UpdateParameter { field: String, value: ParamValue },
    /// Apply several fields as one update.
    UpdateParameters { changes: Vec<ParameterChange> },
    ResetParameters,

    // -- Saved designs --
    SaveDesign {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
    LoadDesign { id: Uuid },
    DeleteDesign { id: Uuid },
    ListDesigns,

    // -- Rendering --
    RequestFrame,

    // -- Assistant --
    /// The user sent a prompt; parameters stay untouched until completion.
    BeginSuggestion { prompt: String },
    /// The assistant answered request `id`.
    CompleteSuggestion { id: Uuid, response: String },
    DiscardSuggestion { id: Uuid },
}

/// Messages from the engine back to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineToUi<P> {
    /// The live parameters after an update, load or reset.
    ParametersChanged {
        parameters: P,
        price: u64,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        ignored: Vec<IgnoredChange>,
    },

    DesignSaved { design: SavedDesign<P> },

    DesignList { designs: Vec<SavedDesign<P>> },

    Frame { frame: RenderFrame },

    /// Send `request` to the assistant.
    SuggestionPending { request: SuggestionRequest },

    /// The assistant's changes were applied.
    SuggestionApplied {
        id: Uuid,
        parameters: P,
        price: u64,
        applied: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        ignored: Vec<IgnoredChange>,
    },

    /// The request was discarded; any reply to it is dropped.
    SuggestionDiscarded { id: Uuid },

    /// An error occurred in the engine.
    Error { message: String },
}
