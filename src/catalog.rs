//! Product catalog.
//!
//! The catalog is an immutable list of products. Each product has a base
//! price and three option groups (colors, materials, features); every option
//! carries a price delta that is added on top of the base price.
//!
//! # Built-in products
//!
//! | Product  | Base price | Category |
//! |----------|-----------:|----------|
//! | `tshirt` |      29.99 | clothing |
//! | `suit`   |     299.99 | suits    |
//! | `shoes`  |     149.99 | shoes    |
//!
//! Option prices are treated as untrusted: they may arrive from a catalog
//! file or a rehydrated configuration, so a non-numeric price deserializes to
//! `None` and contributes nothing to a total.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, warn};

use crate::error::{ConfiguratorError, Result};

/// Which option group an option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum OptionGroup {
    Color,
    Material,
    Feature,
}

/// A selectable variant within one option group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Unique within its group
    pub id: String,
    pub name: String,
    /// Price delta; `None` when the source value was not a number
    #[serde(
        default,
        deserialize_with = "lenient_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    /// Opaque image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductOption {
    /// Create an option without an image
    pub fn new(id: &str, name: &str, price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price: Some(price),
            image: None,
        }
    }

    /// Attach an image reference
    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }

    /// Price contribution of this option (0 when the price is absent)
    #[inline]
    pub fn price_delta(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

/// Accept any JSON value for a price, keeping only numbers.
fn lenient_price<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// The three option groups of a product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductOptions {
    #[serde(default)]
    pub colors: Vec<ProductOption>,
    #[serde(default)]
    pub materials: Vec<ProductOption>,
    #[serde(default)]
    pub features: Vec<ProductOption>,
}

impl ProductOptions {
    /// All options of one group
    pub fn group(&self, group: OptionGroup) -> &[ProductOption] {
        match group {
            OptionGroup::Color => &self.colors,
            OptionGroup::Material => &self.materials,
            OptionGroup::Feature => &self.features,
        }
    }

    /// Look up an option by id within one group
    pub fn find(&self, group: OptionGroup, id: &str) -> Option<&ProductOption> {
        self.group(group).iter().find(|opt| opt.id == id)
    }
}

/// A configurable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub options: ProductOptions,
}

/// Immutable, non-empty list of products.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Build a catalog from a product list.
    ///
    /// # Errors
    ///
    /// Returns a catalog error if the list is empty or contains duplicate ids.
    pub fn new(products: Vec<Product>) -> Result<Self> {
        if products.is_empty() {
            return Err(ConfiguratorError::catalog("catalog must contain at least one product"));
        }
        for (i, product) in products.iter().enumerate() {
            if product.id.trim().is_empty() {
                return Err(ConfiguratorError::catalog(format!(
                    "product #{} has an empty id",
                    i + 1
                )));
            }
            if products[..i].iter().any(|p| p.id == product.id) {
                return Err(ConfiguratorError::catalog(format!(
                    "duplicate product id: {}",
                    product.id
                )));
            }
        }
        Ok(Self { products })
    }

    /// Load a catalog from a JSON file holding an array of products
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let products: Vec<Product> = serde_json::from_str(&content)?;
        debug!(
            "Loaded {} products from {:?}",
            products.len(),
            path.as_ref()
        );
        Self::new(products)
    }

    /// All products in catalog order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product, falling back to the first product on a miss.
    ///
    /// Never fails: an unknown id is logged and the first catalog entry is
    /// returned instead. Use [`Catalog::find_product`] to detect misses.
    pub fn get_product_by_id(&self, id: &str) -> &Product {
        match self.find_product(id) {
            Some(product) => product,
            None => {
                warn!("Product not found: {}, returning first product as fallback", id);
                // Non-empty by construction
                &self.products[0]
            }
        }
    }

    /// Look up a product, returning `None` on a miss
    pub fn find_product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The three products the configurator ships with
    pub fn builtin() -> Self {
        Self {
            products: vec![
                Product {
                    id: "tshirt".to_string(),
                    name: "Premium T-Shirt".to_string(),
                    description: "Comfortable cotton t-shirt with customizable options".to_string(),
                    base_price: 29.99,
                    category: "clothing".to_string(),
                    image: Some("clothing/tshirt-base.png".to_string()),
                    options: ProductOptions {
                        colors: vec![
                            ProductOption::new("black", "Black", 0.0)
                                .with_image("clothing/tshirt-black.png"),
                            ProductOption::new("blue", "Blue", 0.0)
                                .with_image("clothing/tshirt-blue.png"),
                            ProductOption::new("red", "Red", 2.0)
                                .with_image("clothing/tshirt-red.png"),
                        ],
                        materials: vec![
                            ProductOption::new("cotton", "Standard Cotton", 0.0),
                            ProductOption::new("organic", "Organic Cotton", 5.0),
                            ProductOption::new("premium", "Premium Blend", 10.0),
                        ],
                        features: vec![
                            ProductOption::new("pocket", "Chest Pocket", 3.0),
                            ProductOption::new("vneck", "V-Neck Style", 2.0),
                            ProductOption::new("print", "Custom Print", 8.0),
                        ],
                    },
                },
                Product {
                    id: "suit".to_string(),
                    name: "Business Suit".to_string(),
                    description: "Professional suit for business and formal occasions".to_string(),
                    base_price: 299.99,
                    category: "suits".to_string(),
                    image: Some("suits/suit-base.png".to_string()),
                    options: ProductOptions {
                        colors: vec![
                            ProductOption::new("navy", "Navy Blue", 0.0)
                                .with_image("suits/suit-navy.png"),
                            ProductOption::new("black", "Classic Black", 0.0)
                                .with_image("suits/suit-black.png"),
                            ProductOption::new("grey", "Charcoal Grey", 20.0)
                                .with_image("suits/suit-grey.png"),
                        ],
                        materials: vec![
                            ProductOption::new("polyester", "Polyester Blend", 0.0),
                            ProductOption::new("wool", "Wool", 50.0),
                            ProductOption::new("cashmere", "Cashmere Blend", 100.0),
                        ],
                        features: vec![
                            ProductOption::new("slim", "Slim Fit", 0.0),
                            ProductOption::new("classic", "Classic Fit", 0.0),
                            ProductOption::new("double", "Double Breasted", 30.0),
                            ProductOption::new("vent", "Double Vent", 20.0),
                        ],
                    },
                },
                Product {
                    id: "shoes".to_string(),
                    name: "Leather Shoes".to_string(),
                    description: "Handcrafted leather shoes for any occasion".to_string(),
                    base_price: 149.99,
                    category: "shoes".to_string(),
                    image: Some("shoes/shoes-base.png".to_string()),
                    options: ProductOptions {
                        colors: vec![
                            ProductOption::new("black", "Black", 0.0)
                                .with_image("shoes/shoes-black.png"),
                            ProductOption::new("brown", "Brown", 0.0)
                                .with_image("shoes/shoes-brown.png"),
                            ProductOption::new("tan", "Tan", 10.0)
                                .with_image("shoes/shoes-tan.png"),
                        ],
                        materials: vec![
                            ProductOption::new("synthetic", "Synthetic Leather", 0.0),
                            ProductOption::new("genuine", "Genuine Leather", 30.0),
                            ProductOption::new("fullgrain", "Full Grain Leather", 60.0),
                        ],
                        features: vec![
                            ProductOption::new("laces", "Standard Laces", 0.0),
                            ProductOption::new("slip", "Slip-On", 10.0),
                            ProductOption::new("cushion", "Extra Cushioning", 15.0),
                            ProductOption::new("waterproof", "Waterproof Treatment", 25.0),
                        ],
                    },
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_catalog_products() {
        let catalog = Catalog::builtin();
        let ids: Vec<&str> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["tshirt", "suit", "shoes"]);
    }

    #[test]
    fn test_get_product_by_id_hit() {
        let catalog = Catalog::builtin();
        let suit = catalog.get_product_by_id("suit");
        assert_eq!(suit.name, "Business Suit");
        assert_eq!(suit.base_price, 299.99);
    }

    #[test]
    fn test_get_product_by_id_falls_back_to_first() {
        let catalog = Catalog::builtin();
        let product = catalog.get_product_by_id("nonexistent");
        assert_eq!(product.id, "tshirt");
        assert!(catalog.find_product("nonexistent").is_none());
    }

    #[test]
    fn test_find_option_in_group() {
        let catalog = Catalog::builtin();
        let shoes = catalog.get_product_by_id("shoes");
        let tan = shoes.options.find(OptionGroup::Color, "tan").unwrap();
        assert_eq!(tan.price, Some(10.0));
        // Ids are only unique within their own group
        assert!(shoes.options.find(OptionGroup::Material, "tan").is_none());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = Catalog::new(Vec::new()).unwrap_err();
        assert!(matches!(err, ConfiguratorError::Catalog(_)));
    }

    #[test]
    fn test_duplicate_product_ids_rejected() {
        let tshirt = Catalog::builtin().products()[0].clone();
        let err = Catalog::new(vec![tshirt.clone(), tshirt]).unwrap_err();
        assert!(err.to_string().contains("duplicate product id"));
    }

    #[test]
    fn test_non_numeric_price_deserializes_to_none() {
        let opt: ProductOption =
            serde_json::from_str(r#"{"id":"x","name":"X","price":"free"}"#).unwrap();
        assert_eq!(opt.price, None);
        assert_eq!(opt.price_delta(), 0.0);

        let opt: ProductOption = serde_json::from_str(r#"{"id":"y","name":"Y"}"#).unwrap();
        assert_eq!(opt.price, None);
    }

    #[test]
    fn test_load_catalog_from_file() {
        let json = r#"[{
            "id": "mug",
            "name": "Coffee Mug",
            "basePrice": 9.5,
            "options": { "colors": [{ "id": "white", "name": "White", "price": 0 }] }
        }]"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let catalog = Catalog::load_from_file(file.path()).unwrap();
        let mug = catalog.get_product_by_id("mug");
        assert_eq!(mug.base_price, 9.5);
        assert_eq!(mug.options.colors.len(), 1);
        assert!(mug.options.features.is_empty());
    }

    #[test]
    fn test_option_group_parse() {
        assert_eq!("color".parse::<OptionGroup>().unwrap(), OptionGroup::Color);
        assert_eq!(OptionGroup::Feature.to_string(), "feature");
    }
}
