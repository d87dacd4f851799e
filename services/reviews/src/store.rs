//! Reading and merging per-product review documents.
//!
//! Appends are read-merge-write cycles guarded by the document revision:
//! the write only lands if nobody else wrote the document since it was read.
//! On a conflict the cycle is retried with exponential backoff.

use crate::config::ReviewSettings;
use crate::error::ReviewError;
use crate::review::{append_entries, ProductReviews, Review, ReviewSummary};
use backoff::{backoff::Backoff, ExponentialBackoff};
use chrono::Utc;
use thapasya_core::{DocumentPath, DocumentStore, FromFields, Precondition};
use tracing::{debug, error, info, instrument, warn};

/// Review operations over a document store
pub struct ReviewStore<'a> {
    store: &'a dyn DocumentStore,
    settings: &'a ReviewSettings,
}

impl<'a> ReviewStore<'a> {
    pub fn new(store: &'a dyn DocumentStore, settings: &'a ReviewSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &ReviewSettings {
        self.settings
    }

    fn path(&self, product_id: &str) -> Result<DocumentPath, ReviewError> {
        Ok(DocumentPath::new(self.settings.collection.as_str(), product_id)?)
    }

    /// Ids of every product in the catalog
    #[instrument(skip(self))]
    pub async fn list_product_ids(&self) -> Result<Vec<String>, ReviewError> {
        let ids = self
            .store
            .list_ids(&self.settings.products_collection)
            .await?;
        debug!(count = ids.len(), "Listed products");
        Ok(ids)
    }

    /// A product's reviews document, `None` when it has no reviews yet
    #[instrument(skip(self))]
    pub async fn load(&self, product_id: &str) -> Result<Option<ProductReviews>, ReviewError> {
        let path = self.path(product_id)?;
        match self.store.get(&path).await? {
            Some(document) => Ok(Some(ProductReviews::from_fields(&document.fields)?)),
            None => Ok(None),
        }
    }

    /// Append `reviews` to a product and return the new aggregate.
    ///
    /// Stored entries are kept exactly as they are, including fields this
    /// tool does not know about. `totalReviews`, `averageRating` and
    /// `lastUpdated` are recomputed over the merged set.
    #[instrument(skip(self, reviews), fields(new_reviews = reviews.len()))]
    pub async fn append_reviews(
        &self,
        product_id: &str,
        reviews: &[Review],
    ) -> Result<ReviewSummary, ReviewError> {
        if reviews.is_empty() {
            return Err(ReviewError::EmptyBatch);
        }

        let path = self.path(product_id)?;
        let max_attempts = self.settings.max_merge_attempts.max(1);

        let mut backoff = ExponentialBackoff {
            initial_interval: self.settings.retry_base_delay(),
            max_interval: self.settings.retry_max_delay(),
            max_elapsed_time: None,
            ..Default::default()
        };
        backoff.reset();

        let mut attempts = 0u32;

        loop {
            attempts += 1;

            let current = self.store.get(&path).await?;
            let revision = current.as_ref().and_then(|doc| doc.revision.clone());
            let (body, summary) =
                append_entries(current.as_ref().map(|doc| &doc.fields), reviews, Utc::now())?;
            let precondition = Precondition::unchanged_since(revision.as_ref());

            match self
                .store
                .set_with_precondition(&path, body, precondition)
                .await
            {
                Ok(_) => {
                    info!(
                        total_reviews = summary.total_reviews,
                        average_rating = summary.average_rating,
                        attempts = attempts,
                        "Appended reviews"
                    );
                    return Ok(summary);
                }
                Err(e) if e.is_conflict() => {
                    if attempts >= max_attempts {
                        error!(attempts = attempts, "Max merge attempts exceeded");
                        return Err(ReviewError::MergeConflict {
                            product_id: product_id.to_string(),
                            attempts,
                        });
                    }

                    let delay = backoff
                        .next_backoff()
                        .unwrap_or_else(|| self.settings.retry_max_delay());
                    warn!(
                        attempt = attempts,
                        delay_ms = delay.as_millis(),
                        "Reviews changed concurrently, merging again"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
