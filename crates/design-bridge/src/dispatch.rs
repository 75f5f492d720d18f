use design_engine::{Furniture, StoreError, UpdateReport};
use tracing::debug;

use crate::messages::{EngineToUi, UiToEngine};
use crate::state::{BridgeError, BridgeState};

/// Dispatch a UI message to the engine and return a response.
///
/// Failures never escape: they are turned into an `Error` reply.
pub fn dispatch<F: Furniture>(state: &mut BridgeState<F>, msg: UiToEngine) -> EngineToUi<F> {
    match handle_message(state, msg) {
        Ok(response) => response,
        Err(e) => EngineToUi::Error {
            message: e.to_string(),
        },
    }
}

/// JSON in, JSON out. Malformed input yields a serialized `Error` reply.
pub fn dispatch_json<F: Furniture>(state: &mut BridgeState<F>, json: &str) -> String {
    let reply = match serde_json::from_str::<UiToEngine>(json) {
        Ok(msg) => dispatch(state, msg),
        Err(e) => EngineToUi::Error {
            message: BridgeError::Serialization {
                reason: e.to_string(),
            }
            .to_string(),
        },
    };
    serde_json::to_string(&reply).unwrap_or_else(|e| {
        serde_json::json!({ "type": "Error", "message": e.to_string() }).to_string()
    })
}

fn handle_message<F: Furniture>(
    state: &mut BridgeState<F>,
    msg: UiToEngine,
) -> Result<EngineToUi<F>, BridgeError> {
    match msg {
        // -- Parameters --
        UiToEngine::UpdateParameter { field, value } => {
            if !state.store.update_parameter(&field, value) {
                debug!(%field, "update had no effect");
            }
            Ok(parameters_changed(state, UpdateReport::default()))
        }

        UiToEngine::UpdateParameters { changes } => {
            let report = state.store.update_parameters(&changes);
            Ok(parameters_changed(state, report))
        }

        UiToEngine::ResetParameters => {
            state.store.reset_parameters();
            Ok(parameters_changed(state, UpdateReport::default()))
        }

        // -- Saved designs --
        UiToEngine::SaveDesign { name, description } => {
            let design = state
                .store
                .save_design(&name, description.as_deref())
                .map_err(|e| match e {
                    StoreError::Validation(reason) => BridgeError::InvalidDesign { reason },
                    other => BridgeError::Storage {
                        reason: other.to_string(),
                    },
                })?;
            Ok(EngineToUi::DesignSaved { design })
        }

        UiToEngine::LoadDesign { id } => {
            if !state.store.load_design(id) {
                return Err(BridgeError::DesignNotFound { id });
            }
            Ok(parameters_changed(state, UpdateReport::default()))
        }

        UiToEngine::DeleteDesign { id } => {
            state.store.delete_design(id);
            Ok(design_list(state))
        }

        UiToEngine::ListDesigns => Ok(design_list(state)),

        // -- Rendering --
        UiToEngine::RequestFrame => Ok(EngineToUi::Frame {
            frame: state.frame().clone(),
        }),

        // -- Assistant --
        UiToEngine::BeginSuggestion { prompt } => Ok(EngineToUi::SuggestionPending {
            request: state.suggestions.begin(prompt),
        }),

        UiToEngine::CompleteSuggestion { id, response } => {
            let discarded = state.suggestions.is_discarded(id);
            let Some(changes) = state.suggestions.complete(id, &response) else {
                return if discarded {
                    Ok(EngineToUi::SuggestionDiscarded { id })
                } else {
                    Err(BridgeError::UnknownSuggestion { id })
                };
            };
            let report = state.store.update_parameters(&changes);
            Ok(EngineToUi::SuggestionApplied {
                id,
                parameters: state.store.parameters().clone(),
                price: state.store.calculate_price(),
                applied: report.applied,
                ignored: report.ignored,
            })
        }

        UiToEngine::DiscardSuggestion { id } => {
            if state.suggestions.discard(id) {
                Ok(EngineToUi::SuggestionDiscarded { id })
            } else {
                Err(BridgeError::UnknownSuggestion { id })
            }
        }
    }
}

fn parameters_changed<F: Furniture>(state: &BridgeState<F>, report: UpdateReport) -> EngineToUi<F> {
    EngineToUi::ParametersChanged {
        parameters: state.store.parameters().clone(),
        price: state.store.calculate_price(),
        ignored: report.ignored,
    }
}

fn design_list<F: Furniture>(state: &BridgeState<F>) -> EngineToUi<F> {
    EngineToUi::DesignList {
        designs: state.store.saved_designs().to_vec(),
    }
}
