use std::cell::Cell;
use std::rc::Rc;

use design_engine::suggestion::parse_parameter_updates;
use design_engine::{DesignStore, EngineConfig, ParameterChange, StoreError, SuggestionTracker};
use design_types::{
    ChairParameters, LegStyle, Material, SavedDesign, TableParameters,
};
use file_format::{MemoryStorage, SnapshotStorage, StorageError};
use uuid::Uuid;

// ── Helpers ──────────────────────────────────────────────────────────────

fn table_store() -> DesignStore<TableParameters> {
    DesignStore::new(EngineConfig::in_memory())
}

fn temp_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("design-engine-{}", Uuid::new_v4()))
}

/// Storage whose writes fail a set number of times before succeeding.
struct FlakyStorage {
    failures_left: Rc<Cell<u32>>,
    writes: Rc<Cell<u32>>,
}

impl SnapshotStorage<TableParameters> for FlakyStorage {
    fn load(&self) -> Result<Vec<SavedDesign<TableParameters>>, StorageError> {
        Ok(Vec::new())
    }

    fn store(&mut self, _designs: &[SavedDesign<TableParameters>]) -> Result<(), StorageError> {
        self.writes.set(self.writes.get() + 1);
        if self.failures_left.get() > 0 {
            self.failures_left.set(self.failures_left.get() - 1);
            return Err(StorageError::Io {
                path: "flaky.json".into(),
                source: std::io::Error::other("disk full"),
            });
        }
        Ok(())
    }

    fn set_aside(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

fn flaky_store(failures: u32) -> (DesignStore<TableParameters>, Rc<Cell<u32>>) {
    let writes = Rc::new(Cell::new(0));
    let storage = FlakyStorage {
        failures_left: Rc::new(Cell::new(failures)),
        writes: writes.clone(),
    };
    (
        DesignStore::with_storage(EngineConfig::in_memory(), Box::new(storage)),
        writes,
    )
}

// ── Parameter updates ────────────────────────────────────────────────────

#[test]
fn fresh_store_has_defaults_and_price() {
    let store = table_store();
    assert_eq!(store.parameters(), &TableParameters::default());
    assert_eq!(store.calculate_price(), 12_180);
    assert!(store.saved_designs().is_empty());
}

#[test]
fn rounded_corners_clamp_to_cap() {
    let mut store = table_store();
    store.update_parameter("rounded_corner_percent", 150.0);
    assert_eq!(store.parameters().rounded_corner_percent, 95.0);
}

#[test]
fn unit_suffixes_are_accepted() {
    let mut store = table_store();
    store.update_parameter("legHeight", "80cm");
    store.update_parameter("legTiltAngle", "15°");
    assert_eq!(store.parameters().leg_height, 80.0);
    assert_eq!(store.parameters().leg_tilt_angle_deg, 15.0);
}

#[test]
fn non_finite_values_leave_field_unchanged() {
    let mut store = table_store();
    assert!(!store.update_parameter("width", f64::NAN));
    assert!(!store.update_parameter("width", f64::INFINITY));
    assert_eq!(store.parameters().width, 60.0);
}

#[test]
fn plastic_color_survives_material_round_trip() {
    let mut store = table_store();
    store.update_parameter("material", "plastic");
    store.update_parameter("plastic_color", "#FF8800");
    store.update_parameter("material", "titanium");
    assert_ne!(store.material_attributes().base_color.to_hex(), "#FF8800");
    store.update_parameter("material", "plastic");
    assert_eq!(store.material_attributes().base_color.to_hex(), "#FF8800");
}

#[test]
fn zero_tilt_legs_are_vertical() {
    let store = table_store();
    for leg in store.leg_transforms() {
        assert_eq!(leg.bottom.x, leg.top.x);
        assert_eq!(leg.bottom.z, leg.top.z);
        assert_eq!(leg.rotation, [0.0, 0.0, 0.0]);
    }
}

#[test]
fn reset_restores_defaults() {
    let mut store = table_store();
    store.update_parameter("width", 100.0);
    store.reset_parameters();
    assert_eq!(store.parameters(), &TableParameters::default());
}

// ── Save / load / delete ─────────────────────────────────────────────────

#[test]
fn blank_name_is_rejected() {
    let mut store = table_store();
    let result = store.save_design("   ", None);
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert!(store.saved_designs().is_empty());
}

#[test]
fn saved_design_is_listed() {
    let mut store = table_store();
    let saved = store.save_design("  My Desk ", Some("")).unwrap();
    assert_eq!(saved.name, "My Desk");
    assert_eq!(saved.description, None);
    assert_eq!(store.saved_designs().len(), 1);
    assert_eq!(store.saved_designs()[0].name, "My Desk");
    assert_eq!(store.find_design(saved.id), Some(&saved));
}

#[test]
fn save_then_load_restores_exact_parameters() {
    let mut store = table_store();
    store.update_parameters(&[
        ParameterChange::new("width", 83.0),
        ParameterChange::new("leg_top_radius", 7.5),
        ParameterChange::new("material", "bronze"),
    ]);
    let expected = store.parameters().clone();
    let saved = store.save_design("Bronze", None).unwrap();

    store.reset_parameters();
    assert!(store.load_design(saved.id));
    assert_eq!(store.parameters(), &expected);
}

#[test]
fn snapshot_does_not_alias_live_parameters() {
    let mut store = table_store();
    let saved = store.save_design("Before", None).unwrap();
    store.update_parameter("width", 110.0);
    assert_eq!(store.find_design(saved.id).unwrap().parameters.width, 60.0);

    store.load_design(saved.id);
    store.update_parameter("width", 45.0);
    assert_eq!(store.find_design(saved.id).unwrap().parameters.width, 60.0);
}

#[test]
fn load_of_missing_id_is_noop() {
    let mut store = table_store();
    store.update_parameter("width", 99.0);
    assert!(!store.load_design(Uuid::new_v4()));
    assert_eq!(store.parameters().width, 99.0);
}

#[test]
fn delete_of_missing_id_is_noop() {
    let mut store = table_store();
    store.save_design("Keep", None).unwrap();
    assert!(!store.delete_design(Uuid::new_v4()));
    assert_eq!(store.saved_designs().len(), 1);
}

#[test]
fn delete_removes_design() {
    let mut store = table_store();
    let a = store.save_design("A", None).unwrap();
    let b = store.save_design("B", None).unwrap();
    assert!(store.delete_design(a.id));
    let ids: Vec<Uuid> = store.saved_designs().iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![b.id]);
}

#[test]
fn duplicate_names_get_distinct_ids() {
    let mut store = table_store();
    let a = store.save_design("Same", None).unwrap();
    let b = store.save_design("Same", None).unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(store.saved_designs().len(), 2);
}

// ── Persistence ──────────────────────────────────────────────────────────

#[test]
fn designs_survive_reopen_from_disk() {
    let dir = temp_dir();
    let saved = {
        let mut store: DesignStore<TableParameters> =
            DesignStore::new(EngineConfig::with_storage_dir(&dir));
        store.update_parameter("length", 180.0);
        store.save_design("Long table", None).unwrap()
    };
    assert!(dir.join("table-design-storage.json").exists());

    let mut reopened: DesignStore<TableParameters> =
        DesignStore::new(EngineConfig::with_storage_dir(&dir));
    assert_eq!(reopened.saved_designs(), &[saved.clone()]);
    // Live parameters are not persisted.
    assert_eq!(reopened.parameters(), &TableParameters::default());
    assert!(reopened.load_design(saved.id));
    assert_eq!(reopened.parameters().length, 180.0);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn chairs_use_their_own_key() {
    let dir = temp_dir();
    let mut store: DesignStore<ChairParameters> =
        DesignStore::new(EngineConfig::with_storage_dir(&dir));
    store.save_design("Lounge", None).unwrap();
    assert!(dir.join("chair-design-storage.json").exists());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn legacy_browser_blob_is_imported() {
    let blob = r#"{"state": {"savedDesigns": [{"id": "1716550000000", "name": "Old",
        "parameters": {"tableWidth": 100, "material": "titanium"},
        "createdAt": "2024-05-24T11:46:40.000Z", "updatedAt": "2024-05-24T11:46:40.000Z"}]},
        "version": 0}"#;
    let mut store = DesignStore::<TableParameters>::with_storage(
        EngineConfig::in_memory(),
        Box::new(MemoryStorage::with_contents(blob)),
    );
    assert_eq!(store.saved_designs().len(), 1);
    let id = store.saved_designs()[0].id;
    assert!(store.load_design(id));
    assert_eq!(store.parameters().width, 100.0);
    assert_eq!(store.parameters().material, Material::Titanium);
}

#[test]
fn unreadable_storage_starts_empty_and_records_error() {
    let store = DesignStore::<TableParameters>::with_storage(
        EngineConfig::in_memory(),
        Box::new(MemoryStorage::with_contents("{ broken")),
    );
    assert!(store.saved_designs().is_empty());
    assert!(store.last_persistence_error().is_some());
}

#[test]
fn newer_file_is_kept_when_first_save_overwrites() {
    let dir = temp_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("table-design-storage.json");
    let newer = format!(
        r#"{{"format": "furniture-designs", "version": {}, "kind": "table",
            "saved_designs": [{{"precious": true}}]}}"#,
        file_format::FORMAT_VERSION + 1
    );
    std::fs::write(&path, &newer).unwrap();

    let mut store: DesignStore<TableParameters> =
        DesignStore::new(EngineConfig::with_storage_dir(&dir));
    assert!(store.saved_designs().is_empty());
    assert!(store.last_persistence_error().is_some());

    let saved = store.save_design("New", None).unwrap();
    assert!(store.last_persistence_error().is_none());
    let backup = std::fs::read_to_string(dir.join("table-design-storage.json.bak")).unwrap();
    assert_eq!(backup, newer);

    let reopened: DesignStore<TableParameters> =
        DesignStore::new(EngineConfig::with_storage_dir(&dir));
    assert_eq!(reopened.saved_designs(), &[saved]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn earlier_backups_are_not_replaced() {
    let dir = temp_dir();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("table-design-storage.json.bak"), "older").unwrap();
    std::fs::write(dir.join("table-design-storage.json"), "{ truncated").unwrap();

    let mut store: DesignStore<TableParameters> =
        DesignStore::new(EngineConfig::with_storage_dir(&dir));
    store.save_design("New", None).unwrap();

    let older = std::fs::read_to_string(dir.join("table-design-storage.json.bak")).unwrap();
    let truncated = std::fs::read_to_string(dir.join("table-design-storage.json.bak.1")).unwrap();
    assert_eq!(older, "older");
    assert_eq!(truncated, "{ truncated");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn write_failures_are_retried() {
    let (mut store, writes) = flaky_store(2);
    store.save_design("Eventually", None).unwrap();
    assert_eq!(writes.get(), 3);
    assert!(store.last_persistence_error().is_none());
}

#[test]
fn persistent_write_failure_is_non_fatal() {
    let (mut store, writes) = flaky_store(10);
    let saved = store.save_design("Memory only", None).unwrap();
    assert_eq!(writes.get(), 3);
    assert!(store.last_persistence_error().is_some());
    assert_eq!(store.find_design(saved.id).map(|d| d.name.as_str()), Some("Memory only"));

    // Seven failures remain: two more full attempts, then success.
    assert!(matches!(store.flush(), Err(StoreError::Persistence(_))));
    assert!(matches!(store.flush(), Err(StoreError::Persistence(_))));
    assert!(store.flush().is_ok());
    assert!(store.last_persistence_error().is_none());
}

// ── Suggestions ──────────────────────────────────────────────────────────

#[test]
fn suggestion_changes_apply_through_store() {
    let mut store = table_store();
    let mut tracker = SuggestionTracker::new();
    let request = tracker.begin("make it a big bronze table");
    assert_eq!(store.parameters(), &TableParameters::default());

    let changes = tracker
        .complete(
            request.id,
            "Here you go [param-update: tableWidth: 150, material: bronze, sparkle: 11]",
        )
        .unwrap();
    let report = store.update_parameters(&changes);
    assert_eq!(store.parameters().width, 120.0);
    assert_eq!(store.parameters().material, Material::Bronze);
    assert_eq!(report.ignored.len(), 1);
}

#[test]
fn discarded_suggestion_changes_nothing() {
    let mut store = table_store();
    let mut tracker = SuggestionTracker::new();
    let request = tracker.begin("wider");
    tracker.discard(request.id);
    if let Some(changes) = tracker.complete(request.id, "[param-update: width: 100]") {
        store.update_parameters(&changes);
    }
    assert_eq!(store.parameters().width, 60.0);
}

#[test]
fn fenced_chair_reply_applies() {
    let mut store: DesignStore<ChairParameters> = DesignStore::new(EngineConfig::in_memory());
    let reply = "---\n材料：bronze\n座椅宽度：55cm\n座椅高度：65cm\n靠背高度：45cm\n设计说明：现代风格\n---";
    let report = store.update_parameters(&parse_parameter_updates(reply));
    let p = store.parameters();
    assert_eq!(p.material, Material::Bronze);
    assert_eq!((p.seat_width, p.seat_height, p.backrest_height), (55.0, 65.0, 45.0));
    assert_eq!(p.leg_style, LegStyle::Modern);
    assert_eq!(report.applied.len(), 4);
    assert_eq!(report.ignored.len(), 1);
}
