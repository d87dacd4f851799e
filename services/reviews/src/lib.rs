//! Product review manager
//!
//! Generates sample reviews, accepts custom ones, and keeps each product's
//! `reviews/{productId}` document with its derived aggregate
//! (`totalReviews`, `averageRating`, `lastUpdated`).
//!
//! ## Flow
//!
//! ```text
//! SampleData ─▶ ReviewGenerator ─┐
//!                                 ├─▶ ReviewStore::append_reviews ─▶ DocumentStore
//! custom_review ─────────────────┘      (read, merge, conditional write,
//!                                        retry on conflict)
//! ```

pub mod config;
pub mod console;
pub mod error;
pub mod generator;
pub mod review;
pub mod sample;
pub mod store;

pub use config::{ConfigValidationError, ReviewSettings, ReviewsConfig};
pub use console::{generate_for_products, render_reviews, BatchOutcome, MenuChoice, ReviewConsole};
pub use error::ReviewError;
pub use generator::{custom_review, ReviewGenerator};
pub use review::{ProductReviews, Review, ReviewSummary};
pub use sample::{CustomerProfile, SampleData};
pub use store::ReviewStore;
