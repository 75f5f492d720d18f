use design_bridge::messages::*;
use design_bridge::*;
use design_engine::{EngineConfig, ParameterChange};
use design_types::{ChairParameters, Material, ParamValue, TableParameters};
use furniture_kernel::BuildModel;
use uuid::Uuid;

// ── Helper functions ─────────────────────────────────────────────────────

fn table_state() -> BridgeState<TableParameters> {
    BridgeState::new(EngineConfig::in_memory())
}

fn chair_state() -> BridgeState<ChairParameters> {
    BridgeState::new(EngineConfig::in_memory())
}

fn update(field: &str, value: impl Into<ParamValue>) -> UiToEngine {
    UiToEngine::UpdateParameter {
        field: field.to_string(),
        value: value.into(),
    }
}

fn save(state: &mut BridgeState<TableParameters>, name: &str) -> Uuid {
    let response = dispatch(
        state,
        UiToEngine::SaveDesign {
            name: name.to_string(),
            description: None,
        },
    );
    match response {
        EngineToUi::DesignSaved { design } => design.id,
        other => panic!("expected DesignSaved, got {other:?}"),
    }
}

// ── Serde Round-Trip Tests ───────────────────────────────────────────────

#[test]
fn serde_roundtrip_update_parameter() {
    let msg = update("width", 80.0);
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"type\":\"UpdateParameter\""));
    let deserialized: UiToEngine = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, msg);
}

#[test]
fn serde_save_design_description_is_optional() {
    let msg: UiToEngine =
        serde_json::from_str(r#"{"type":"SaveDesign","name":"My Desk"}"#).unwrap();
    assert_eq!(
        msg,
        UiToEngine::SaveDesign {
            name: "My Desk".to_string(),
            description: None,
        }
    );
}

#[test]
fn serde_unit_variants_parse() {
    let msg: UiToEngine = serde_json::from_str(r#"{"type":"RequestFrame"}"#).unwrap();
    assert_eq!(msg, UiToEngine::RequestFrame);
    let msg: UiToEngine = serde_json::from_str(r#"{"type":"ResetParameters"}"#).unwrap();
    assert_eq!(msg, UiToEngine::ResetParameters);
}

#[test]
fn serde_parameters_changed_omits_empty_ignored() {
    let msg: EngineToUi<TableParameters> = EngineToUi::ParametersChanged {
        parameters: TableParameters::default(),
        price: 12_180,
        ignored: Vec::new(),
    };
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"type\":\"ParametersChanged\""));
    assert!(!json.contains("ignored"));
    let deserialized: EngineToUi<TableParameters> = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, msg);
}

// ── Parameter Dispatch Tests ─────────────────────────────────────────────

#[test]
fn dispatch_update_returns_parameters_and_price() {
    let mut state = table_state();
    let response = dispatch(&mut state, update("width", 60.0));
    match response {
        EngineToUi::ParametersChanged {
            parameters, price, ..
        } => {
            assert_eq!(parameters, TableParameters::default());
            assert_eq!(price, 12_180);
        }
        other => panic!("expected ParametersChanged, got {other:?}"),
    }
}

#[test]
fn dispatch_update_clamps_out_of_range_value() {
    let mut state = table_state();
    dispatch(&mut state, update("width", 500.0));
    assert_eq!(state.store.parameters().width, 120.0);
}

#[test]
fn dispatch_update_accepts_legacy_field_names() {
    let mut state = table_state();
    dispatch(&mut state, update("legHeight", 80.0));
    assert_eq!(state.store.parameters().leg_height, 80.0);
}

#[test]
fn dispatch_batch_reports_ignored_fields() {
    let mut state = table_state();
    let msg = UiToEngine::UpdateParameters {
        changes: vec![
            ParameterChange::new("length", 150.0),
            ParameterChange::new("colour_of_sky", 3.0),
        ],
    };
    match dispatch(&mut state, msg) {
        EngineToUi::ParametersChanged {
            parameters,
            ignored,
            ..
        } => {
            assert_eq!(parameters.length, 150.0);
            assert_eq!(ignored.len(), 1);
            assert_eq!(ignored[0].field, "colour_of_sky");
        }
        other => panic!("expected ParametersChanged, got {other:?}"),
    }
}

#[test]
fn dispatch_reset_restores_defaults() {
    let mut state = table_state();
    dispatch(&mut state, update("material", "bronze"));
    dispatch(&mut state, UiToEngine::ResetParameters);
    assert_eq!(state.store.parameters(), &TableParameters::default());
}

// ── Saved Design Tests ───────────────────────────────────────────────────

#[test]
fn dispatch_save_and_list() {
    let mut state = table_state();
    let id = save(&mut state, "My Desk");

    match dispatch(&mut state, UiToEngine::ListDesigns) {
        EngineToUi::DesignList { designs } => {
            assert_eq!(designs.len(), 1);
            assert_eq!(designs[0].id, id);
            assert_eq!(designs[0].name, "My Desk");
        }
        other => panic!("expected DesignList, got {other:?}"),
    }
}

#[test]
fn dispatch_save_blank_name_is_error() {
    let mut state = table_state();
    let response = dispatch(
        &mut state,
        UiToEngine::SaveDesign {
            name: "   ".to_string(),
            description: None,
        },
    );
    assert!(matches!(response, EngineToUi::Error { .. }));
    assert!(state.store.saved_designs().is_empty());
}

#[test]
fn dispatch_load_restores_snapshot() {
    let mut state = table_state();
    dispatch(&mut state, update("material", "titanium"));
    let id = save(&mut state, "Titanium");
    dispatch(&mut state, UiToEngine::ResetParameters);

    match dispatch(&mut state, UiToEngine::LoadDesign { id }) {
        EngineToUi::ParametersChanged { parameters, .. } => {
            assert_eq!(parameters.material, Material::Titanium);
        }
        other => panic!("expected ParametersChanged, got {other:?}"),
    }
}

#[test]
fn dispatch_load_missing_design_is_error() {
    let mut state = table_state();
    dispatch(&mut state, update("width", 90.0));
    let response = dispatch(
        &mut state,
        UiToEngine::LoadDesign { id: Uuid::new_v4() },
    );
    assert!(matches!(response, EngineToUi::Error { .. }));
    assert_eq!(state.store.parameters().width, 90.0);
}

#[test]
fn dispatch_delete_returns_remaining_designs() {
    let mut state = table_state();
    let first = save(&mut state, "First");
    let second = save(&mut state, "Second");

    match dispatch(&mut state, UiToEngine::DeleteDesign { id: first }) {
        EngineToUi::DesignList { designs } => {
            assert_eq!(designs.len(), 1);
            assert_eq!(designs[0].id, second);
        }
        other => panic!("expected DesignList, got {other:?}"),
    }

    // Deleting again is a no-op.
    let response = dispatch(&mut state, UiToEngine::DeleteDesign { id: first });
    assert!(matches!(response, EngineToUi::DesignList { designs } if designs.len() == 1));
}

// ── Render Frame Tests ───────────────────────────────────────────────────

#[test]
fn dispatch_request_frame_has_four_legs() {
    let mut state = table_state();
    match dispatch(&mut state, UiToEngine::RequestFrame) {
        EngineToUi::Frame { frame } => {
            assert_eq!(frame.legs.len(), 4);
            assert_eq!(frame.leg_meshes.len(), 4);
            assert!(frame.panels.is_empty());
            assert!(!frame.top_plate.is_empty());
            assert_eq!(frame.price, 12_180);
        }
        other => panic!("expected Frame, got {other:?}"),
    }
}

#[test]
fn frame_is_rebuilt_only_after_change() {
    let mut state = table_state();
    dispatch(&mut state, UiToEngine::RequestFrame);
    assert_eq!(state.frame_builds(), 1);

    dispatch(&mut state, UiToEngine::RequestFrame);
    assert_eq!(state.frame_builds(), 1);

    // Same value: parameters unchanged, cache still valid.
    dispatch(&mut state, update("width", 60.0));
    dispatch(&mut state, UiToEngine::RequestFrame);
    assert_eq!(state.frame_builds(), 1);

    dispatch(&mut state, update("width", 100.0));
    dispatch(&mut state, UiToEngine::RequestFrame);
    assert_eq!(state.frame_builds(), 2);
}

#[test]
fn frame_geometry_matches_current_parameters() {
    let mut state = table_state();
    let narrow = state.frame().top_plate.clone();
    dispatch(&mut state, update("width", 100.0));
    assert_ne!(state.frame().top_plate, narrow);
    dispatch(&mut state, update("width", 60.0));
    assert_eq!(state.frame().top_plate, narrow);
    assert_eq!(state.frame_builds(), 3);

    let expected = state.store.parameters().build_model();
    assert_eq!(state.frame().legs, expected.legs);
}

#[test]
fn frame_material_follows_parameters() {
    let mut state = table_state();
    let before = state.frame().material;
    dispatch(&mut state, update("material", "plastic"));
    let after = state.frame().material;
    assert_ne!(before, after);
}

// ── Suggestion Tests ─────────────────────────────────────────────────────

fn begin(state: &mut BridgeState<TableParameters>, prompt: &str) -> Uuid {
    match dispatch(
        state,
        UiToEngine::BeginSuggestion {
            prompt: prompt.to_string(),
        },
    ) {
        EngineToUi::SuggestionPending { request } => request.id,
        other => panic!("expected SuggestionPending, got {other:?}"),
    }
}

#[test]
fn suggestion_does_not_touch_parameters_until_complete() {
    let mut state = table_state();
    let id = begin(&mut state, "make it wider");
    assert_eq!(state.store.parameters(), &TableParameters::default());

    let response = dispatch(
        &mut state,
        UiToEngine::CompleteSuggestion {
            id,
            response: "Sure [param-update: width: 100, material: bronze]".to_string(),
        },
    );
    match response {
        EngineToUi::SuggestionApplied {
            id: applied_id,
            parameters,
            applied,
            ignored,
            ..
        } => {
            assert_eq!(applied_id, id);
            assert_eq!(parameters.width, 100.0);
            assert_eq!(parameters.material, Material::Bronze);
            assert_eq!(applied.len(), 2);
            assert!(ignored.is_empty());
        }
        other => panic!("expected SuggestionApplied, got {other:?}"),
    }
}

#[test]
fn discarded_suggestion_reply_is_dropped() {
    let mut state = table_state();
    let id = begin(&mut state, "make it wider");
    let response = dispatch(&mut state, UiToEngine::DiscardSuggestion { id });
    assert_eq!(response, EngineToUi::SuggestionDiscarded { id });

    let response = dispatch(
        &mut state,
        UiToEngine::CompleteSuggestion {
            id,
            response: "[param-update: width: 100]".to_string(),
        },
    );
    assert_eq!(response, EngineToUi::SuggestionDiscarded { id });
    assert_eq!(state.store.parameters().width, 60.0);
}

#[test]
fn unknown_suggestion_is_error() {
    let mut state = table_state();
    let id = Uuid::new_v4();
    let response = dispatch(
        &mut state,
        UiToEngine::CompleteSuggestion {
            id,
            response: "[param-update: width: 100]".to_string(),
        },
    );
    assert!(matches!(response, EngineToUi::Error { .. }));

    let response = dispatch(&mut state, UiToEngine::DiscardSuggestion { id });
    assert!(matches!(response, EngineToUi::Error { .. }));
}

// ── JSON Dispatch Tests ──────────────────────────────────────────────────

#[test]
fn dispatch_json_update() {
    let mut state = table_state();
    let reply = dispatch_json(
        &mut state,
        r#"{"type":"UpdateParameter","field":"width","value":80}"#,
    );
    let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(value["type"], "ParametersChanged");
    assert_eq!(value["parameters"]["width"], 80.0);
}

#[test]
fn dispatch_json_malformed_is_error() {
    let mut state = table_state();
    let reply = dispatch_json(&mut state, "{not json");
    let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(value["type"], "Error");
    assert!(value["message"]
        .as_str()
        .unwrap()
        .starts_with("serialization error"));
}

#[test]
fn dispatch_json_unknown_type_is_error() {
    let mut state = table_state();
    let reply = dispatch_json(&mut state, r#"{"type":"Explode"}"#);
    let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(value["type"], "Error");
}

// ── Chair Tests ──────────────────────────────────────────────────────────

#[test]
fn chair_frame_has_backrest_panel() {
    let mut state = chair_state();
    match dispatch(&mut state, UiToEngine::RequestFrame) {
        EngineToUi::Frame { frame } => {
            assert_eq!(frame.legs.len(), 4);
            assert_eq!(frame.panels.len(), 1);
            assert_eq!(frame.price, 8_060);
        }
        other => panic!("expected Frame, got {other:?}"),
    }
}

#[test]
fn chair_update_uses_chair_fields() {
    let mut state = chair_state();
    dispatch(&mut state, update("seatHeight", 55.0));
    assert_eq!(state.store.parameters().seat_height, 55.0);

    let response = dispatch(
        &mut state,
        UiToEngine::UpdateParameters {
            changes: vec![ParameterChange::new("width", 90.0)],
        },
    );
    assert!(
        matches!(response, EngineToUi::ParametersChanged { ignored, .. } if ignored.len() == 1)
    );
}
