//! Configurator actions
//!
//! [`Configurator`] is the action layer over [`ConfiguratorState`]: every
//! action commits one or more mutations and then recomputes the total, in
//! that order. It owns the catalog it looks products up in and the key-value
//! store configurations are saved to.
//!
//! # Example
//!
//! ```
//! use fc_configurator::Configurator;
//!
//! let mut configurator = Configurator::in_memory();
//! configurator.select_product_by_id("tshirt");
//! configurator.select_color_by_id("red");
//! configurator.select_material_by_id("organic");
//! configurator.toggle_feature_by_id("print");
//!
//! let total = configurator.state().configuration().total_price;
//! assert!((total - 44.99).abs() < 1e-9);
//! ```

mod state;
mod summary;

pub use state::ConfiguratorState;
pub use summary::ConfigurationSummary;

use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, OptionGroup, Product, ProductOption};
use crate::error::{MSG_FEATURES_INVALID, MSG_LOAD_FAILED, MSG_SAVE_FAILED};
use crate::share::{self, ShareParams};
use crate::storage::{KeyValueStore, MemoryStore, SaveOutcome, storage_key};

/// Error messages containing these come from browser add-ons, not from us
const IGNORED_ERROR_SOURCES: [&str; 3] = ["extension", "webext", "content-script"];

/// The configuration wizard.
pub struct Configurator {
    catalog: Catalog,
    state: ConfiguratorState,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for Configurator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configurator")
            .field("catalog", &self.catalog)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for Configurator {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Configurator {
    /// Create a configurator over a catalog and a store
    pub fn new(catalog: Catalog, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            catalog,
            state: ConfiguratorState::new(),
            store,
        }
    }

    /// Built-in catalog, in-memory store
    pub fn in_memory() -> Self {
        Self::new(Catalog::builtin(), Box::new(MemoryStore::new()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &ConfiguratorState {
        &self.state
    }

    /// Direct access to the state layer. Mutations made through this handle
    /// are not followed by a recomputation.
    pub fn state_mut(&mut self) -> &mut ConfiguratorState {
        &mut self.state
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    // ------------------------------------------------------------------
    // Wizard navigation
    // ------------------------------------------------------------------

    /// Advance one step; no-op on the last step
    pub fn next_step(&mut self) {
        if let Some(next) = self.state.current_step().next() {
            self.state.set_current_step(next);
        }
    }

    /// Go back one step; no-op on the first step
    pub fn prev_step(&mut self) {
        if let Some(previous) = self.state.current_step().previous() {
            self.state.set_current_step(previous);
        }
    }

    // ------------------------------------------------------------------
    // Selection actions
    // ------------------------------------------------------------------

    /// Select a product; `None` stores an error and changes nothing else
    pub fn select_product(&mut self, product: Option<&Product>) {
        if self.state.set_product(product) {
            self.calculate_total();
        }
    }

    /// Select a product by id, falling back to the first catalog product
    pub fn select_product_by_id(&mut self, product_id: &str) {
        let product = self.catalog.get_product_by_id(product_id).clone();
        self.select_product(Some(&product));
    }

    pub fn select_color(&mut self, color: Option<&ProductOption>) {
        self.state.set_color(color);
        self.calculate_total();
    }

    pub fn select_material(&mut self, material: Option<&ProductOption>) {
        self.state.set_material(material);
        self.calculate_total();
    }

    /// Select a color of the current product by id.
    ///
    /// Returns false (and changes nothing) if no product is selected or the
    /// product has no such color.
    pub fn select_color_by_id(&mut self, color_id: &str) -> bool {
        match self.selected_option(OptionGroup::Color, color_id) {
            Some(color) => {
                self.select_color(Some(&color));
                true
            }
            None => false,
        }
    }

    /// Select a material of the current product by id; see
    /// [`Configurator::select_color_by_id`]
    pub fn select_material_by_id(&mut self, material_id: &str) -> bool {
        match self.selected_option(OptionGroup::Material, material_id) {
            Some(material) => {
                self.select_material(Some(&material));
                true
            }
            None => false,
        }
    }

    /// Add the feature if absent, remove it if present, then recompute.
    ///
    /// If the feature list is corrupted it is reset to empty and an error is
    /// stored instead; the feature is not toggled.
    pub fn toggle_feature(&mut self, feature: Option<&ProductOption>) {
        let Some(feature) = feature else {
            return;
        };

        if self.state.configuration().features.is_corrupted() {
            warn!("Feature list is corrupted, resetting it");
            self.state.set_error(MSG_FEATURES_INVALID);
            self.state.configuration_mut().features = Default::default();
            return;
        }

        if self.state.is_feature_selected(&feature.id) {
            self.state.remove_feature(&feature.id);
        } else {
            self.state.add_feature(feature);
        }
        self.calculate_total();
    }

    /// Toggle a feature of the current product by id; false if unknown
    pub fn toggle_feature_by_id(&mut self, feature_id: &str) -> bool {
        match self.selected_option(OptionGroup::Feature, feature_id) {
            Some(feature) => {
                self.toggle_feature(Some(&feature));
                true
            }
            None => false,
        }
    }

    fn selected_option(&self, group: OptionGroup, id: &str) -> Option<ProductOption> {
        let Some(product) = self.state.selected_product() else {
            warn!("Cannot select {} {}: No product selected", group, id);
            return None;
        };
        let option = product.options.find(group, id).cloned();
        if option.is_none() {
            warn!("{} not found for {}: {}", group, product.id, id);
        }
        option
    }

    /// Recompute the total price
    pub fn calculate_total(&mut self) {
        self.state.calculate_total();
    }

    /// Back to step 1 with nothing selected
    pub fn reset_configuration(&mut self) {
        self.state.reset();
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn can_proceed(&self) -> bool {
        self.state.can_proceed()
    }

    pub fn is_feature_selected(&self, feature_id: &str) -> bool {
        self.state.is_feature_selected(feature_id)
    }

    pub fn current_step_progress(&self) -> u8 {
        self.state.current_step_progress()
    }

    pub fn has_error(&self) -> bool {
        self.state.has_error()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn clear_error(&mut self) {
        self.state.clear_error();
    }

    /// Query string that reproduces the current configuration
    pub fn shareable_query(&self) -> String {
        share::encode_query(self.state.configuration())
    }

    /// Full shareable URL under `base`, empty without a product
    pub fn shareable_url(&self, base: &str) -> String {
        share::shareable_url(base, self.state.configuration())
    }

    pub fn summary(&self) -> ConfigurationSummary {
        ConfigurationSummary::from_state(&self.state)
    }

    // ------------------------------------------------------------------
    // Shareable URL decoding
    // ------------------------------------------------------------------

    /// Rebuild the configuration from decoded share parameters.
    ///
    /// The product is looked up with the catalog's fallback, the wizard is
    /// reset and the product re-selected. Color, material and features are
    /// only applied if the product offers them; unknown ids are logged and
    /// skipped. Returns false if the parameters name no product.
    pub fn load_configuration(&mut self, params: &ShareParams) -> bool {
        let Some(product_id) = params.product() else {
            warn!("No product ID in configuration data");
            return false;
        };

        let product = self.catalog.get_product_by_id(product_id).clone();

        self.state.reset();
        if !self.state.set_product(Some(&product)) {
            return false;
        }

        if let Some(color_id) = params.color() {
            match product.options.find(OptionGroup::Color, color_id) {
                Some(color) => self.state.set_color(Some(color)),
                None => warn!("Color not found: {}", color_id),
            }
        }

        if let Some(material_id) = params.material() {
            match product.options.find(OptionGroup::Material, material_id) {
                Some(material) => self.state.set_material(Some(material)),
                None => warn!("Material not found: {}", material_id),
            }
        }

        for feature_id in params.requested_features() {
            match product.options.find(OptionGroup::Feature, &feature_id) {
                Some(feature) => self.state.add_feature(feature),
                None => warn!("Feature not found: {}", feature_id),
            }
        }

        self.calculate_total();
        info!(
            "Loaded configuration for {} (total {:.2})",
            product.id,
            self.state.configuration().total_price
        );
        true
    }

    /// Parse a shareable URL (or fragment, or query string) and load it.
    ///
    /// A malformed URL stores an error and returns false.
    pub fn load_from_url(&mut self, input: &str) -> bool {
        match ShareParams::from_url(input) {
            Ok(params) => self.load_configuration(&params),
            Err(e) => {
                error!("Error loading configuration: {}", e);
                self.state.set_error(MSG_LOAD_FAILED);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Save the configuration as JSON under `fc_config_<id>`.
    ///
    /// Fails without an active configuration id or selected product, or when
    /// the store rejects the write. Failures are returned, never raised.
    pub fn save_configuration(&mut self) -> SaveOutcome {
        let configuration = self.state.configuration();
        let (Some(config_id), Some(_)) = (configuration.id, self.state.selected_product()) else {
            error!("Error saving configuration: No valid configuration to save");
            return SaveOutcome::Failed {
                error: MSG_SAVE_FAILED.to_string(),
            };
        };

        let written = configuration
            .to_json()
            .map_err(Into::into)
            .and_then(|json| self.store.set(&storage_key(&config_id), &json));

        match written {
            Ok(()) => {
                debug!("Saved configuration {}", config_id);
                SaveOutcome::Saved { config_id }
            }
            Err(e) => {
                error!("Error saving configuration: {}", e);
                SaveOutcome::Failed {
                    error: MSG_SAVE_FAILED.to_string(),
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Error boundary
    // ------------------------------------------------------------------

    /// Record an error raised outside the configurator.
    ///
    /// Errors originating from browser extensions are ignored.
    pub fn report_external_error(&mut self, message: &str) {
        if IGNORED_ERROR_SOURCES
            .iter()
            .any(|source| message.contains(source))
        {
            warn!("Ignoring browser extension error");
            return;
        }
        error!("Global error: {}", message);
        self.state.set_error(format!("An error occurred: {}", message));
    }
}
