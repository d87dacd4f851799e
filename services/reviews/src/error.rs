use thapasya_core::StoreError;
use thiserror::Error;

/// Review manager errors
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Reviews for product {product_id} kept changing; gave up after {attempts} attempts")]
    MergeConflict { product_id: String, attempts: u32 },

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("No reviews to add")]
    EmptyBatch,
}
