//! Printable summary of the current configuration.

use std::fmt;

use crate::catalog::ProductOption;
use crate::configurator::ConfiguratorState;
use crate::wizard::WizardStep;

/// Snapshot of what the user has picked so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSummary {
    pub step: WizardStep,
    pub product: Option<(String, f64)>,
    pub color: Option<ProductOption>,
    pub material: Option<ProductOption>,
    pub features: Vec<ProductOption>,
    pub total_price: f64,
    pub error: Option<String>,
}

impl ConfigurationSummary {
    pub fn from_state(state: &ConfiguratorState) -> Self {
        let config = state.configuration();
        Self {
            step: state.current_step(),
            product: state
                .selected_product()
                .map(|p| (p.name.clone(), p.base_price)),
            color: config.color.clone(),
            material: config.material.clone(),
            features: config.features.as_slice().map(<[_]>::to_vec).unwrap_or_default(),
            total_price: config.total_price,
            error: state.error().map(str::to_string),
        }
    }
}

fn write_option(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    option: Option<&ProductOption>,
) -> fmt::Result {
    match option {
        Some(opt) => writeln!(f, "  {:<9} {} (+{:.2})", label, opt.name, opt.price_delta()),
        None => writeln!(f, "  {:<9} -", label),
    }
}

impl fmt::Display for ConfigurationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.step)?;
        match &self.product {
            Some((name, base)) => writeln!(f, "  {:<9} {} ({:.2})", "Product", name, base)?,
            None => return writeln!(f, "  No product selected"),
        }
        write_option(f, "Color", self.color.as_ref())?;
        write_option(f, "Material", self.material.as_ref())?;
        if self.features.is_empty() {
            writeln!(f, "  {:<9} -", "Features")?;
        }
        for (i, feature) in self.features.iter().enumerate() {
            let label = if i == 0 { "Features" } else { "" };
            writeln!(f, "  {:<9} {} (+{:.2})", label, feature.name, feature.price_delta())?;
        }
        writeln!(f, "  {:<9} {:.2}", "Total", self.total_price)?;
        if let Some(error) = &self.error {
            writeln!(f, "  Error: {}", error)?;
        }
        Ok(())
    }
}
