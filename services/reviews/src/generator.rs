//! Sample and custom review construction.

use crate::error::ReviewError;
use crate::review::Review;
use crate::sample::SampleData;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Oldest a generated review can be, in days
const MAX_REVIEW_AGE_DAYS: i64 = 180;
const MAX_HELPFUL_VOTES: u32 = 15;
const VERIFIED_PROBABILITY: f64 = 0.75;

/// Draws plausible reviews from a [`SampleData`] pool
pub struct ReviewGenerator<R = StdRng> {
    data: SampleData,
    rng: R,
}

impl ReviewGenerator<StdRng> {
    /// Generator seeded from the operating system
    pub fn from_entropy(data: SampleData) -> Self {
        Self::new(data, StdRng::from_entropy())
    }
}

impl<R: Rng> ReviewGenerator<R> {
    pub fn new(data: SampleData, rng: R) -> Self {
        Self { data, rng }
    }

    /// Up to `count` reviews, each from a different customer.
    ///
    /// At most one review per customer is produced, so the result is capped
    /// at the number of sample customers.
    pub fn generate(&mut self, count: usize) -> Vec<Review> {
        let now = Utc::now();
        let amount = count.min(self.data.customers.len());

        let customers: Vec<_> = self
            .data
            .customers
            .choose_multiple(&mut self.rng, amount)
            .cloned()
            .collect();

        customers
            .into_iter()
            .map(|customer| {
                let review_text = self
                    .data
                    .review_texts
                    .choose(&mut self.rng)
                    .cloned()
                    .unwrap_or_default();
                let age_days = self.rng.gen_range(1..=MAX_REVIEW_AGE_DAYS);

                Review {
                    customer_name: customer.name,
                    customer_image: customer.image,
                    customer_location: customer.location,
                    review_text,
                    rating: self.rng.gen_range(4..=5),
                    review_date: now - Duration::days(age_days),
                    verified_purchase: self.rng.gen_bool(VERIFIED_PROBABILITY),
                    helpful_votes: self.rng.gen_range(0..=MAX_HELPFUL_VOTES),
                }
            })
            .collect()
    }
}

/// A review typed in by an operator, dated now and marked verified.
pub fn custom_review(
    customer_name: &str,
    review_text: &str,
    rating: u8,
    location: &str,
    customer_image: &str,
) -> Result<Review, ReviewError> {
    if !(1..=5).contains(&rating) {
        return Err(ReviewError::InvalidRating(rating));
    }

    Ok(Review {
        customer_name: customer_name.to_string(),
        customer_image: customer_image.to_string(),
        customer_location: location.to_string(),
        review_text: review_text.to_string(),
        rating,
        review_date: Utc::now(),
        verified_purchase: true,
        helpful_votes: 0,
    })
}
