//! Catalog seeder
//!
//! Writes the storefront's fixed featured product set to a single document
//! (`featured_products/products` by default) as a full replace, then reads
//! it back to confirm what landed.

pub mod catalog;
pub mod config;
pub mod seeder;

pub use catalog::{featured_products, with_direct_image_links, FeaturedCatalog, Product};
pub use config::{CatalogConfig, ConfigValidationError, SeederConfig};
pub use seeder::{read_featured_products, run, save_featured_products, SeedError, SeedSettings};
