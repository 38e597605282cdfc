//! Shareable URL codec.
//!
//! A configuration is shared as a hash route with query parameters:
//!
//! ```text
//! <base>#/configurator?product=suit&color=grey&material=wool&features=double%2Cvent
//! ```
//!
//! Encoding always writes the short parameter names. Decoding accepts both
//! spellings of every field (`product`/`productId`, `color`/`colorId`,
//! `material`/`materialId`, `features`/`featureIds`); applying the decoded
//! parameters to a configurator is done by
//! [`crate::Configurator::load_configuration`].

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::form_urlencoded;

use crate::configuration::Configuration;
use crate::error::Result;
use crate::routing::Location;

/// Route the shareable URL points at
pub const CONFIGURATOR_ROUTE: &str = "#/configurator";

/// Feature ids as received: already split, or comma-separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureIds {
    List(Vec<String>),
    Joined(String),
}

impl FeatureIds {
    /// The individual ids, empty entries dropped.
    ///
    /// Ids are taken verbatim; whitespace around a comma stays part of the id.
    pub fn to_vec(&self) -> Vec<String> {
        let ids: Vec<&str> = match self {
            Self::List(ids) => ids.iter().map(String::as_str).collect(),
            Self::Joined(joined) => joined.split(',').collect(),
        };
        ids.into_iter()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn is_blank(&self) -> bool {
        match self {
            Self::List(ids) => ids.is_empty(),
            Self::Joined(joined) => joined.is_empty(),
        }
    }
}

/// Decoded shareable-URL parameters.
///
/// Both spellings of each field are kept; the accessors pick the short name
/// first and fall back to the long one when the short one is missing or
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareParams {
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub color_id: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub material_id: Option<String>,
    #[serde(default)]
    pub features: Option<FeatureIds>,
    #[serde(default)]
    pub feature_ids: Option<FeatureIds>,
}

fn first_present<'a>(primary: &'a Option<String>, alias: &'a Option<String>) -> Option<&'a str> {
    primary
        .as_deref()
        .filter(|v| !v.is_empty())
        .or_else(|| alias.as_deref().filter(|v| !v.is_empty()))
}

impl ShareParams {
    /// Parse a form-urlencoded query string (a leading `?` is allowed).
    ///
    /// For the scalar fields the first occurrence wins. Repeated `features`
    /// or `featureIds` keys collect into a list.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match &*key {
                "product" => set_once(&mut params.product, value),
                "productId" => set_once(&mut params.product_id, value),
                "color" => set_once(&mut params.color, value),
                "colorId" => set_once(&mut params.color_id, value),
                "material" => set_once(&mut params.material, value),
                "materialId" => set_once(&mut params.material_id, value),
                "features" => push_feature(&mut params.features, value),
                "featureIds" => push_feature(&mut params.feature_ids, value),
                other => warn!("Ignoring unknown share parameter: {}", other),
            }
        }
        params
    }

    /// Parse the parameters out of a shareable URL.
    ///
    /// Accepts a full URL, a `#/configurator?...` fragment, a
    /// `/configurator?...` path or a bare query string.
    ///
    /// # Errors
    ///
    /// Returns a URL error if a full URL cannot be parsed.
    pub fn from_url(input: &str) -> Result<Self> {
        let location = Location::parse(input)?;
        Ok(location
            .query
            .as_deref()
            .map(Self::from_query)
            .unwrap_or_default())
    }

    pub fn product(&self) -> Option<&str> {
        first_present(&self.product, &self.product_id)
    }

    pub fn color(&self) -> Option<&str> {
        first_present(&self.color, &self.color_id)
    }

    pub fn material(&self) -> Option<&str> {
        first_present(&self.material, &self.material_id)
    }

    /// Requested feature ids, in request order
    pub fn requested_features(&self) -> Vec<String> {
        self.features
            .as_ref()
            .filter(|f| !f.is_blank())
            .or(self.feature_ids.as_ref())
            .map(FeatureIds::to_vec)
            .unwrap_or_default()
    }
}

fn set_once(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn push_feature(slot: &mut Option<FeatureIds>, value: String) {
    *slot = Some(match slot.take() {
        None => FeatureIds::Joined(value),
        Some(FeatureIds::Joined(first)) => FeatureIds::List(vec![first, value]),
        Some(FeatureIds::List(mut ids)) => {
            ids.push(value);
            FeatureIds::List(ids)
        }
    });
}

/// Encode a configuration as a query string.
///
/// `product` is always written; `color` and `material` only when selected
/// with a non-empty id; `features` as a comma-joined id list only when at
/// least one feature has a non-empty id. Without a product the result is
/// empty.
pub fn encode_query(configuration: &Configuration) -> String {
    let Some(product_id) = configuration
        .product_id
        .as_deref()
        .filter(|id| !id.is_empty())
    else {
        warn!("Cannot create shareable URL: No product selected");
        return String::new();
    };

    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("product", product_id);

    if let Some(color) = configuration.color.as_ref().filter(|c| !c.id.is_empty()) {
        query.append_pair("color", &color.id);
    }
    if let Some(material) = configuration.material.as_ref().filter(|m| !m.id.is_empty()) {
        query.append_pair("material", &material.id);
    }

    let feature_ids: Vec<&str> = configuration
        .features
        .ids()
        .into_iter()
        .filter(|id| !id.is_empty())
        .collect();
    if !feature_ids.is_empty() {
        query.append_pair("features", &feature_ids.join(","));
    }

    query.finish()
}

/// Full shareable URL: `<base>#/configurator?<query>`, empty without a product
pub fn shareable_url(base: &str, configuration: &Configuration) -> String {
    let query = encode_query(configuration);
    if query.is_empty() {
        return query;
    }
    format!("{}{}?{}", base, CONFIGURATOR_ROUTE, query)
}
