//! Configuration for the review manager.
//!
//! Loaded through [`thapasya_core::config::load`] under the tool name
//! `reviews`.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thapasya_core::{ConfigError, FirestoreConfig, LoggingConfig};

/// Review manager configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewsConfig {
    #[serde(default)]
    pub firestore: FirestoreConfig,
    #[serde(default)]
    pub reviews: ReviewSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where reviews live and how merges behave
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSettings {
    /// Collection of per-product review documents
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Collection whose document ids are the product ids
    #[serde(default = "default_products_collection")]
    pub products_collection: String,
    /// Reviews generated per product when the prompt is left blank
    #[serde(default = "default_reviews_per_product")]
    pub default_reviews_per_product: usize,
    /// Location used for custom reviews when none is given
    #[serde(default = "default_location")]
    pub default_location: String,
    /// Image attached to custom reviews
    #[serde(default = "default_customer_image")]
    pub default_customer_image: String,
    /// Attempts at a read-merge-write before giving up on conflicts
    #[serde(default = "default_max_merge_attempts")]
    pub max_merge_attempts: u32,
    /// First delay after a conflicting write (milliseconds)
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Upper bound on the delay between attempts (milliseconds)
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

fn default_collection() -> String {
    "reviews".to_string()
}

fn default_products_collection() -> String {
    "products".to_string()
}

fn default_reviews_per_product() -> usize {
    3
}

fn default_location() -> String {
    "India".to_string()
}

fn default_customer_image() -> String {
    "https://images.unsplash.com/photo-1494790108755-2616b612b672?w=60&h=60&fit=crop&crop=face"
        .to_string()
}

fn default_max_merge_attempts() -> u32 {
    5
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            products_collection: default_products_collection(),
            default_reviews_per_product: default_reviews_per_product(),
            default_location: default_location(),
            default_customer_image: default_customer_image(),
            max_merge_attempts: default_max_merge_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl ReviewSettings {
    /// Get base retry delay as Duration.
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Get maximum retry delay as Duration.
    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }
}

impl ReviewsConfig {
    /// Load configuration from files and environment
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        thapasya_core::config::load("reviews", explicit)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let reviews = &self.reviews;

        if reviews.collection.is_empty() {
            return Err(ConfigValidationError::MissingField(
                "reviews.collection".to_string(),
            ));
        }
        if reviews.products_collection.is_empty() {
            return Err(ConfigValidationError::MissingField(
                "reviews.products_collection".to_string(),
            ));
        }
        if reviews.collection.contains('/') || reviews.products_collection.contains('/') {
            return Err(ConfigValidationError::InvalidValue {
                field: "reviews.collection".to_string(),
                message: "Collection names cannot contain '/'".to_string(),
            });
        }
        if reviews.max_merge_attempts == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "reviews.max_merge_attempts".to_string(),
                message: "At least one attempt is required".to_string(),
            });
        }
        if reviews.default_reviews_per_product == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "reviews.default_reviews_per_product".to_string(),
                message: "At least one review per product is required".to_string(),
            });
        }
        if reviews.retry_base_delay_ms > reviews.retry_max_delay_ms {
            return Err(ConfigValidationError::InvalidValue {
                field: "reviews.retry_base_delay_ms".to_string(),
                message: "Base delay cannot exceed the maximum delay".to_string(),
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
