//! Configurator state and its mutations.
//!
//! This is the state layer: every method here changes exactly what it names
//! and nothing else. In particular no mutation recomputes the total price on
//! its own; [`ConfiguratorState::calculate_total`] is a separate operation
//! that the action layer ([`super::Configurator`]) runs right after each
//! mutation.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::catalog::{Product, ProductOption};
use crate::configuration::{Configuration, FeatureList};
use crate::error::MSG_SELECT_PRODUCT_FAILED;
use crate::wizard::WizardStep;

/// Wizard state: current step, selected product, configuration and last error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfiguratorState {
    current_step: WizardStep,
    selected_product: Option<Product>,
    configuration: Configuration,
    error: Option<String>,
}

impl ConfiguratorState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[inline]
    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    #[inline]
    pub fn total_steps(&self) -> u8 {
        WizardStep::TOTAL_STEPS
    }

    #[inline]
    pub fn selected_product(&self) -> Option<&Product> {
        self.selected_product.as_ref()
    }

    #[inline]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Mutable access for collaborators that write into the configuration
    /// directly (for example a rehydration layer).
    #[inline]
    pub fn configuration_mut(&mut self) -> &mut Configuration {
        &mut self.configuration
    }

    #[inline]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[inline]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether the current step's requirement is met.
    ///
    /// Step 1 needs a product, step 2 a color, step 3 a material; the review
    /// step always allows proceeding.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            WizardStep::SelectProduct => self.selected_product.is_some(),
            WizardStep::ChooseColor => self.configuration.color.is_some(),
            WizardStep::ChooseMaterial => self.configuration.material.is_some(),
            WizardStep::Review => true,
        }
    }

    /// Whether a feature is selected; false if the feature list is corrupted
    pub fn is_feature_selected(&self, feature_id: &str) -> bool {
        self.configuration.features.contains(feature_id)
    }

    /// Wizard progress as a rounded percentage
    pub fn current_step_progress(&self) -> u8 {
        self.current_step.progress_percent()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn set_current_step(&mut self, step: WizardStep) {
        self.current_step = step;
    }

    /// Select a product and start a fresh configuration for it.
    ///
    /// Without a product this soft-fails: the error message is stored and
    /// nothing else changes. Returns whether the product was applied.
    pub fn set_product(&mut self, product: Option<&Product>) -> bool {
        let Some(product) = product else {
            warn!("Invalid product selected");
            self.error = Some(MSG_SELECT_PRODUCT_FAILED.to_string());
            return false;
        };

        self.configuration = Configuration {
            id: Some(Uuid::new_v4()),
            product_id: Some(product.id.clone()),
            total_price: product.base_price,
            ..Configuration::default()
        };
        self.selected_product = Some(product.clone());
        self.error = None;
        debug!(
            "Selected product {} (configuration {:?})",
            product.id, self.configuration.id
        );
        true
    }

    /// Replace the color; `None` is ignored
    pub fn set_color(&mut self, color: Option<&ProductOption>) {
        if let Some(color) = color {
            self.configuration.color = Some(color.clone());
            self.error = None;
        }
    }

    /// Replace the material; `None` is ignored
    pub fn set_material(&mut self, material: Option<&ProductOption>) {
        if let Some(material) = material {
            self.configuration.material = Some(material.clone());
            self.error = None;
        }
    }

    /// Append a feature unless one with the same id is already selected.
    ///
    /// A corrupted feature list is replaced by an empty one first.
    pub fn add_feature(&mut self, feature: &ProductOption) {
        if self.configuration.features.is_corrupted() {
            self.configuration.features = FeatureList::default();
        }
        if let FeatureList::List(features) = &mut self.configuration.features {
            if !features.iter().any(|f| f.id == feature.id) {
                features.push(feature.clone());
            }
        }
        self.error = None;
    }

    /// Remove the feature with this id, if selected.
    ///
    /// A corrupted feature list is replaced by an empty one and nothing else
    /// happens.
    pub fn remove_feature(&mut self, feature_id: &str) {
        if self.configuration.features.is_corrupted() {
            self.configuration.features = FeatureList::default();
            return;
        }
        if let FeatureList::List(features) = &mut self.configuration.features {
            if let Some(index) = features.iter().position(|f| f.id == feature_id) {
                features.remove(index);
            }
        }
        self.error = None;
    }

    /// Recompute the total price from the selected product and options.
    ///
    /// Without a selected product the total is left alone. Each option price
    /// is added only if present; a corrupted feature list counts as empty and
    /// is repaired. A non-finite sum falls back to the base price.
    pub fn calculate_total(&mut self) {
        let Some(product) = self.selected_product.as_ref() else {
            warn!("Cannot calculate total: No product selected");
            return;
        };
        let base_price = product.base_price;
        let mut total = base_price;

        if let Some(price) = self.configuration.color.as_ref().and_then(|c| c.price) {
            total += price;
        }
        if let Some(price) = self.configuration.material.as_ref().and_then(|m| m.price) {
            total += price;
        }

        if self.configuration.features.is_corrupted() {
            warn!("Features is not a list, skipping feature prices");
            self.configuration.features = FeatureList::default();
        }
        if let Some(features) = self.configuration.features.as_slice() {
            total += features.iter().filter_map(|f| f.price).sum::<f64>();
        }

        if !total.is_finite() {
            warn!("Invalid total calculated, using base price as fallback");
            total = base_price;
        }

        self.configuration.total_price = total;
        self.error = None;
    }

    /// Back to step 1 with no product, a default configuration and no error
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn tshirt() -> Product {
        Catalog::builtin().get_product_by_id("tshirt").clone()
    }

    #[test]
    fn test_default_state() {
        let state = ConfiguratorState::new();
        assert_eq!(state.current_step(), WizardStep::SelectProduct);
        assert_eq!(state.total_steps(), 4);
        assert!(state.selected_product().is_none());
        assert!(!state.has_error());
        assert!(!state.can_proceed());
    }

    #[test]
    fn test_set_product_assigns_id_and_base_price() {
        let mut state = ConfiguratorState::new();
        assert!(state.set_product(Some(&tshirt())));
        let config = state.configuration();
        assert!(config.id.is_some());
        assert_eq!(config.product_id.as_deref(), Some("tshirt"));
        assert_eq!(config.total_price, 29.99);
    }

    #[test]
    fn test_set_product_none_sets_error_only() {
        let mut state = ConfiguratorState::new();
        state.set_product(Some(&tshirt()));
        let before = state.configuration().clone();

        assert!(!state.set_product(None));
        assert_eq!(state.error(), Some(MSG_SELECT_PRODUCT_FAILED));
        assert_eq!(state.configuration(), &before);
        assert_eq!(state.selected_product().map(|p| p.id.as_str()), Some("tshirt"));
    }

    #[test]
    fn test_mutations_do_not_recompute() {
        let mut state = ConfiguratorState::new();
        let product = tshirt();
        state.set_product(Some(&product));
        state.set_color(product.options.colors.iter().find(|c| c.id == "red"));
        // Stale until recomputed
        assert_eq!(state.configuration().total_price, 29.99);
        state.calculate_total();
        assert!((state.configuration().total_price - 31.99).abs() < 1e-9);
    }

    #[test]
    fn test_add_feature_dedups_by_id() {
        let mut state = ConfiguratorState::new();
        let pocket = ProductOption::new("pocket", "Chest Pocket", 3.0);
        state.add_feature(&pocket);
        state.add_feature(&pocket);
        assert_eq!(state.configuration().features.ids(), vec!["pocket"]);
        state.remove_feature("pocket");
        assert!(state.configuration().features.is_empty());
    }

    #[test]
    fn test_add_feature_repairs_corrupted_list() {
        let mut state = ConfiguratorState::new();
        state.configuration_mut().features = FeatureList::Corrupted(serde_json::json!(42));
        state.add_feature(&ProductOption::new("print", "Custom Print", 8.0));
        assert_eq!(state.configuration().features.ids(), vec!["print"]);
    }

    #[test]
    fn test_calculate_total_without_product_is_noop() {
        let mut state = ConfiguratorState::new();
        state.configuration_mut().total_price = 12.5;
        state.calculate_total();
        assert_eq!(state.configuration().total_price, 12.5);
    }

    #[test]
    fn test_calculate_total_skips_missing_prices() {
        let mut state = ConfiguratorState::new();
        state.set_product(Some(&tshirt()));
        let mut unpriced = ProductOption::new("mystery", "Mystery", 0.0);
        unpriced.price = None;
        state.set_material(Some(&unpriced));
        state.add_feature(&ProductOption::new("print", "Custom Print", 8.0));
        state.calculate_total();
        assert!((state.configuration().total_price - 37.99).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_total_non_finite_falls_back_to_base() {
        let mut state = ConfiguratorState::new();
        state.set_product(Some(&tshirt()));
        state.set_color(Some(&ProductOption::new("void", "Void", f64::INFINITY)));
        state.add_feature(&ProductOption::new("anti", "Anti", f64::NEG_INFINITY));
        state.calculate_total();
        assert_eq!(state.configuration().total_price, 29.99);
    }

    #[test]
    fn test_calculate_total_repairs_corrupted_features() {
        let mut state = ConfiguratorState::new();
        state.set_product(Some(&tshirt()));
        state.configuration_mut().features = FeatureList::Corrupted(serde_json::json!("x"));
        state.calculate_total();
        assert!(!state.configuration().features.is_corrupted());
        assert_eq!(state.configuration().total_price, 29.99);
    }

    #[test]
    fn test_calculate_total_keeps_valid_rehydrated_features() {
        let mut state = ConfiguratorState::new();
        state.set_product(Some(Catalog::builtin().get_product_by_id("suit")));
        let rehydrated = Configuration::from_json(
            r#"{"features":[{"id":"double","name":"Double Breasted","price":30},null]}"#,
        )
        .unwrap();
        state.configuration_mut().features = rehydrated.features;

        state.calculate_total();

        assert_eq!(state.configuration().features.ids(), vec!["double"]);
        assert!((state.configuration().total_price - 329.99).abs() < 1e-9);
    }

    #[test]
    fn test_can_proceed_per_step() {
        let mut state = ConfiguratorState::new();
        let product = tshirt();
        state.set_product(Some(&product));
        assert!(state.can_proceed());

        state.set_current_step(WizardStep::ChooseColor);
        assert!(!state.can_proceed());
        state.set_color(product.options.colors.first());
        assert!(state.can_proceed());

        state.set_current_step(WizardStep::ChooseMaterial);
        assert!(!state.can_proceed());
        state.set_material(product.options.materials.first());
        assert!(state.can_proceed());

        state.set_current_step(WizardStep::Review);
        assert!(state.can_proceed());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = ConfiguratorState::new();
        state.set_product(Some(&tshirt()));
        state.set_current_step(WizardStep::ChooseMaterial);
        state.set_error("boom");
        state.reset();
        assert_eq!(state, ConfiguratorState::default());
    }
}
