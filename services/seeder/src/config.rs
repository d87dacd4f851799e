//! Configuration for the catalog seeder.
//!
//! Loaded through [`thapasya_core::config::load`] under the tool name
//! `seeder`, so `config/seeder.toml` and `THAPASYA__CATALOG__VERIFY=false`
//! both apply.

use serde::Deserialize;
use std::path::Path;
use thapasya_core::{ConfigError, DocumentPath, FirestoreConfig, LoggingConfig};

/// Seeder configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeederConfig {
    #[serde(default)]
    pub firestore: FirestoreConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the featured set is written and how
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Collection holding the featured document
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Document id inside `collection`
    #[serde(default = "default_document")]
    pub document: String,
    /// Read the document back after writing
    #[serde(default = "default_verify")]
    pub verify: bool,
    /// Rewrite Drive share links into direct-view URLs before writing
    #[serde(default)]
    pub convert_image_links: bool,
}

fn default_collection() -> String {
    "featured_products".to_string()
}

fn default_document() -> String {
    "products".to_string()
}

fn default_verify() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            document: default_document(),
            verify: default_verify(),
            convert_image_links: false,
        }
    }
}

impl CatalogConfig {
    /// Path of the featured products document
    pub fn target(&self) -> Result<DocumentPath, thapasya_core::StoreError> {
        DocumentPath::new(self.collection.as_str(), self.document.as_str())
    }
}

impl SeederConfig {
    /// Load configuration from files and environment
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        thapasya_core::config::load("seeder", explicit)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.catalog.collection.is_empty() {
            return Err(ConfigValidationError::MissingField(
                "catalog.collection".to_string(),
            ));
        }
        if self.catalog.document.is_empty() {
            return Err(ConfigValidationError::MissingField(
                "catalog.document".to_string(),
            ));
        }
        if let Err(e) = self.catalog.target() {
            return Err(ConfigValidationError::InvalidValue {
                field: "catalog".to_string(),
                message: e.to_string(),
            });
        }
        if self.firestore.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "firestore.request_timeout_secs".to_string(),
                message: "Timeout must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
