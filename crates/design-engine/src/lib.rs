//! The configurator's state machine.
//!
//! A [`DesignStore`] owns the live parameter record and the list of saved
//! snapshots. Geometry, meshes, material and price are derived on demand from
//! the live record; the snapshot list is written through to storage on every
//! save and delete.

pub mod config;
pub mod material;
pub mod pricing;
pub mod suggestion;
pub mod types;

use design_types::{
    ChairParameters, DesignParameters, ParamError, ParamValue, SavedDesign, TableParameters,
};
use file_format::{SnapshotStorage, StorageError, DEFAULT_STORAGE_KEY};
use furniture_kernel::{BuildModel, FurnitureModel, LegPlacement};
use furniture_tessellation::{tessellate_model, tessellate_plate, FurnitureMesh, TriangleMesh};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub use crate::config::EngineConfig;
pub use crate::material::MaterialAttributes;
pub use crate::pricing::Priced;
pub use crate::suggestion::{SuggestionRequest, SuggestionTracker};
pub use crate::types::{IgnoredChange, ParameterChange, StoreError, UpdateReport};

/// A furniture family the store can manage.
pub trait Furniture: DesignParameters + BuildModel + Priced + 'static {
    /// Storage key used when the config does not name one.
    const STORAGE_KEY: &'static str;
}

impl Furniture for TableParameters {
    const STORAGE_KEY: &'static str = DEFAULT_STORAGE_KEY;
}

impl Furniture for ChairParameters {
    const STORAGE_KEY: &'static str = "chair-design-storage";
}

/// Live parameters plus saved snapshots for one furniture family.
pub struct DesignStore<F: Furniture> {
    parameters: F,
    saved_designs: Vec<SavedDesign<F>>,
    storage: Box<dyn SnapshotStorage<F>>,
    config: EngineConfig,
    last_persistence_error: Option<StorageError>,
    /// The stored list could not be read; it must be set aside before the
    /// first write replaces it.
    unread_storage: bool,
}

impl<F: Furniture> DesignStore<F> {
    /// Open the storage named by `config` and load its snapshot list.
    ///
    /// A list that cannot be read is logged and the store starts empty. The
    /// unreadable list is set aside, not overwritten, by the first write.
    pub fn new(config: EngineConfig) -> Self {
        let storage = config.open_storage::<F>(F::STORAGE_KEY);
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: EngineConfig, storage: Box<dyn SnapshotStorage<F>>) -> Self {
        let mut store = Self {
            parameters: F::default(),
            saved_designs: Vec::new(),
            storage,
            config,
            last_persistence_error: None,
            unread_storage: false,
        };
        match store.storage.load() {
            Ok(designs) => {
                info!(kind = %F::KIND, count = designs.len(), "design store opened");
                store.saved_designs = designs;
            }
            Err(err) => {
                warn!(kind = %F::KIND, error = %err, "could not load saved designs");
                store.last_persistence_error = Some(err);
                store.unread_storage = true;
            }
        }
        store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parameters(&self) -> &F {
        &self.parameters
    }

    /// Set one field by name. Unknown names and unreadable values are logged
    /// and ignored; numbers are clamped. Returns whether a field was written.
    #[instrument(skip(self, value), fields(kind = %F::KIND))]
    pub fn update_parameter(&mut self, name: &str, value: impl Into<ParamValue>) -> bool {
        let value = value.into();
        match apply_change(&mut self.parameters, name, &value) {
            Ok(_) => true,
            Err(err) => {
                debug!(%err, "ignored parameter update");
                false
            }
        }
    }

    /// Apply a batch as one update: every accepted change lands together, in
    /// order, and readers never see a partial batch.
    #[instrument(skip(self, changes), fields(kind = %F::KIND, count = changes.len()))]
    pub fn update_parameters(&mut self, changes: &[ParameterChange]) -> UpdateReport {
        let mut staged = self.parameters.clone();
        let mut report = UpdateReport::default();
        for change in changes {
            match apply_change(&mut staged, &change.field, &change.value) {
                Ok(field) => report.applied.push(field),
                Err(err) => {
                    debug!(field = %change.field, %err, "ignored parameter update");
                    report.ignored.push(IgnoredChange {
                        field: change.field.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        self.parameters = staged;
        report
    }

    pub fn reset_parameters(&mut self) {
        self.parameters = F::default();
    }

    pub fn calculate_price(&self) -> u64 {
        self.parameters.price()
    }

    /// Snapshot the live parameters under `name`.
    #[instrument(skip(self, description), fields(kind = %F::KIND))]
    pub fn save_design(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<SavedDesign<F>, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("design name must not be blank".to_string()));
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let design = SavedDesign::new(name, description, &self.parameters);
        self.saved_designs.push(design.clone());
        info!(id = %design.id, "design saved");
        self.persist();
        Ok(design)
    }

    /// Copy a snapshot into the live parameters. Returns `false` if absent.
    #[instrument(skip(self), fields(kind = %F::KIND))]
    pub fn load_design(&mut self, id: Uuid) -> bool {
        let Some(design) = self.find_design(id) else {
            debug!("no such design");
            return false;
        };
        let mut parameters = design.parameters.clone();
        parameters.sanitize();
        self.parameters = parameters;
        info!("design loaded");
        true
    }

    /// Remove a snapshot. Returns `false` if absent.
    #[instrument(skip(self), fields(kind = %F::KIND))]
    pub fn delete_design(&mut self, id: Uuid) -> bool {
        let before = self.saved_designs.len();
        self.saved_designs.retain(|d| d.id != id);
        if self.saved_designs.len() == before {
            debug!("no such design");
            return false;
        }
        info!("design deleted");
        self.persist();
        true
    }

    pub fn saved_designs(&self) -> &[SavedDesign<F>] {
        &self.saved_designs
    }

    pub fn find_design(&self, id: Uuid) -> Option<&SavedDesign<F>> {
        self.saved_designs.iter().find(|d| d.id == id)
    }

    /// Error from the most recent failed write or load, cleared by the next
    /// successful write.
    pub fn last_persistence_error(&self) -> Option<&StorageError> {
        self.last_persistence_error.as_ref()
    }

    /// Write the snapshot list now and report failure to the caller.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.write_with_retries()?;
        self.last_persistence_error = None;
        Ok(())
    }

    fn write_with_retries(&mut self) -> Result<(), StorageError> {
        if self.unread_storage {
            self.storage.set_aside()?;
            self.unread_storage = false;
        }
        let mut attempt = 0;
        loop {
            match self.storage.store(&self.saved_designs) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < self.config.persist_retries => {
                    attempt += 1;
                    debug!(attempt, error = %err, "retrying design write");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Best-effort write; the in-memory list stays authoritative on failure.
    fn persist(&mut self) {
        match self.write_with_retries() {
            Ok(()) => self.last_persistence_error = None,
            Err(err) => {
                warn!(kind = %F::KIND, error = %err, "could not persist saved designs");
                self.last_persistence_error = Some(err);
            }
        }
    }

    // ── Render-facing reads ─────────────────────────────────────────────

    pub fn model(&self) -> FurnitureModel {
        self.parameters.build_model()
    }

    pub fn top_plate_mesh(&self) -> TriangleMesh {
        tessellate_plate(&self.model().top, &self.config.mesh)
    }

    pub fn leg_transforms(&self) -> Vec<LegPlacement> {
        self.model().legs
    }

    pub fn meshes(&self) -> FurnitureMesh {
        tessellate_model(&self.model(), &self.config.mesh)
    }

    pub fn material_attributes(&self) -> MaterialAttributes {
        material::resolve(self.parameters.material(), self.parameters.plastic_color())
    }
}

/// Resolve `name` and write `value` into `params`, returning the canonical
/// field name.
fn apply_change<F: DesignParameters>(
    params: &mut F,
    name: &str,
    value: &ParamValue,
) -> Result<String, ParamError> {
    let field: F::Field = name.parse()?;
    params.set(field, value)?;
    debug_assert!(params.is_within_ranges(), "{} left out of range", field);
    Ok(field.to_string())
}
