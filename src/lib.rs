//! FC Product Configurator Library
//!
//! Pick a product, choose color, material and feature options, get a live
//! price, and share or restore the configuration through URL parameters.

pub mod catalog;
pub mod cli;
pub mod config_file;
pub mod configuration;
pub mod configurator;
pub mod error;
pub mod routing;
pub mod share;
pub mod storage;
pub mod wizard;

// Re-export main types for convenience
pub use catalog::{Catalog, OptionGroup, Product, ProductOption, ProductOptions};
pub use config_file::AppConfig;
pub use configuration::{Configuration, FeatureList};
pub use configurator::{ConfigurationSummary, Configurator, ConfiguratorState};
pub use error::{ConfiguratorError, Result};
pub use routing::{Location, Navigation, Route};
pub use share::{FeatureIds, ShareParams, encode_query, shareable_url};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SaveOutcome, storage_key};
pub use wizard::WizardStep;
