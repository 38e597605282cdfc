//! Wizard steps for the configurator flow.
//!
//! The configurator progresses through these steps linearly:
//!
//! ```text
//! SelectProduct (1) -> ChooseColor (2) -> ChooseMaterial (3) -> Review (4)
//! ```
//!
//! Moving past either end is a no-op rather than an error. Whether the user
//! may leave a step is decided by the configurator (`can_proceed`), not here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of the linear wizard flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum WizardStep {
    /// Pick one product from the catalog.
    #[default]
    SelectProduct = 1,
    /// Pick a color for the selected product.
    ChooseColor = 2,
    /// Pick a material for the selected product.
    ChooseMaterial = 3,
    /// Toggle features and review the total.
    Review = 4,
}

impl WizardStep {
    /// Total number of steps.
    pub const TOTAL_STEPS: u8 = 4;

    /// Get the step for a 1-indexed number, if it is in range.
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::SelectProduct),
            2 => Some(Self::ChooseColor),
            3 => Some(Self::ChooseMaterial),
            4 => Some(Self::Review),
            _ => None,
        }
    }

    /// Get the step number (1-indexed).
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Get the next step, or `None` at the last step.
    pub const fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// Get the previous step, or `None` at the first step.
    pub const fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    /// Progress through the wizard as a rounded percentage.
    pub fn progress_percent(self) -> u8 {
        (f64::from(self.number()) / f64::from(Self::TOTAL_STEPS) * 100.0).round() as u8
    }

    /// Get the display title for this step.
    pub const fn title(self) -> &'static str {
        match self {
            Self::SelectProduct => "Choose Your Product",
            Self::ChooseColor => "Select a Color",
            Self::ChooseMaterial => "Select a Material",
            Self::Review => "Add Features & Review",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step {}/{}: {}",
            self.number(),
            Self::TOTAL_STEPS,
            self.title()
        )
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or_else(|| format!("wizard step out of range: {}", n))
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_sequence() {
        let mut step = WizardStep::default();
        let mut seen = vec![step.number()];
        while let Some(next) = step.next() {
            step = next;
            seen.push(step.number());
        }
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(step, WizardStep::Review);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(WizardStep::SelectProduct.previous(), None);
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(5), None);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(WizardStep::SelectProduct.progress_percent(), 25);
        assert_eq!(WizardStep::ChooseMaterial.progress_percent(), 75);
        assert_eq!(WizardStep::Review.progress_percent(), 100);
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&WizardStep::ChooseColor).unwrap();
        assert_eq!(json, "2");
        assert!(serde_json::from_str::<WizardStep>("9").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            WizardStep::ChooseColor.to_string(),
            "Step 2/4: Select a Color"
        );
    }
}
