//! The configuration record: chosen product, chosen options and total price.
//!
//! This is the value that gets shared and persisted. It serializes with the
//! same camelCase keys the browser front end stores
//! (`id`, `productId`, `color`, `material`, `features`, `totalPrice`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::catalog::ProductOption;

/// Selected features, in insertion order and unique by id.
///
/// A configuration rehydrated from external JSON may carry something other
/// than a list here; that value is kept as `Corrupted` so the configurator can
/// detect it and self-heal instead of failing to load the whole record. A list
/// with malformed entries is still a list: the bad entries are dropped one by
/// one and the rest are kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureList {
    List(Vec<ProductOption>),
    Corrupted(Value),
}

impl<'de> Deserialize<'de> for FeatureList {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(entries) => Self::List(
                entries
                    .into_iter()
                    .filter_map(|entry| match ProductOption::deserialize(&entry) {
                        Ok(option) => Some(option),
                        Err(e) => {
                            warn!("Skipping malformed feature {}: {}", entry, e);
                            None
                        }
                    })
                    .collect(),
            ),
            other => Self::Corrupted(other),
        })
    }
}

impl Default for FeatureList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl FeatureList {
    /// The selected features, or `None` if the list is corrupted
    pub fn as_slice(&self) -> Option<&[ProductOption]> {
        match self {
            Self::List(features) => Some(features),
            Self::Corrupted(_) => None,
        }
    }

    #[inline]
    pub fn is_corrupted(&self) -> bool {
        matches!(self, Self::Corrupted(_))
    }

    /// Whether a feature with this id is selected (false when corrupted)
    pub fn contains(&self, id: &str) -> bool {
        self.as_slice()
            .is_some_and(|features| features.iter().any(|f| f.id == id))
    }

    /// Selected feature ids in insertion order
    pub fn ids(&self) -> Vec<&str> {
        self.as_slice()
            .map(|features| features.iter().map(|f| f.id.as_str()).collect())
            .unwrap_or_default()
    }

    /// Number of selected features (0 when corrupted)
    pub fn len(&self) -> usize {
        self.as_slice().map_or(0, <[ProductOption]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A user's in-progress or completed product customization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Assigned when a product is selected
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub color: Option<ProductOption>,
    #[serde(default)]
    pub material: Option<ProductOption>,
    #[serde(default)]
    pub features: FeatureList,
    /// Derived; only refreshed by an explicit recomputation
    #[serde(default)]
    pub total_price: f64,
}

impl Configuration {
    /// A configuration is active once it has both an id and a product
    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.product_id.is_some()
    }

    /// Serialize to the JSON blob stored under `fc_config_<id>`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored JSON blob
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
