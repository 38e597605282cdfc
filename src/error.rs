//! Error handling module for the configurator
//!
//! Provides the crate error type using thiserror, plus the user-facing
//! messages the configurator stores in its `error` field. Most failures in the
//! wizard are soft: they end up as one of these messages rather than as an
//! `Err` returned to the caller.

use thiserror::Error;

/// Shown when `select_product` is called without a product.
pub const MSG_SELECT_PRODUCT_FAILED: &str = "Failed to select product. Please try again.";

/// Shown when the feature list was found in a corrupted state.
pub const MSG_FEATURES_INVALID: &str = "Features array is invalid. Resetting features.";

/// Shown when a shareable URL could not be applied.
pub const MSG_LOAD_FAILED: &str = "Failed to load configuration. Starting with default options.";

/// Returned in a failed save outcome.
pub const MSG_SAVE_FAILED: &str = "Failed to save configuration. Please try again.";

/// Main error type for the configurator
#[derive(Error, Debug)]
pub enum ConfiguratorError {
    /// IO errors (storage directory, catalog file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog errors (empty catalog, malformed product data)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Storage errors (key-value store rejected an operation)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Shareable URL could not be parsed
    #[error("Invalid shareable URL: {0}")]
    Url(String),

    /// State errors (no active configuration, no product selected)
    #[error("State error: {0}")]
    State(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for configurator operations
pub type Result<T> = std::result::Result<T, ConfiguratorError>;

impl ConfiguratorError {
    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a URL error
    pub fn url(msg: impl Into<String>) -> Self {
        Self::Url(msg.into())
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }
}

impl From<url::ParseError> for ConfiguratorError {
    fn from(err: url::ParseError) -> Self {
        Self::Url(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfiguratorError::catalog("no products");
        assert_eq!(err.to_string(), "Catalog error: no products");

        let err = ConfiguratorError::state("no product selected");
        assert_eq!(err.to_string(), "State error: no product selected");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ConfiguratorError = io_err.into();
        assert!(matches!(err, ConfiguratorError::Io(_)));
    }

    #[test]
    fn test_url_error_conversion() {
        let parse_err = url::Url::parse("http://[::1").unwrap_err();
        let err: ConfiguratorError = parse_err.into();
        assert!(matches!(err, ConfiguratorError::Url(_)));
    }
}
