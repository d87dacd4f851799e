//! Review records and the per-product reviews document.

use chrono::{DateTime, Utc};
use thapasya_core::{Fields, FromFields, StoreError, ToFields, Value};

/// A single customer review
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub customer_name: String,
    pub customer_image: String,
    pub customer_location: String,
    pub review_text: String,
    /// Stars, 1 to 5
    pub rating: u8,
    pub review_date: DateTime<Utc>,
    pub verified_purchase: bool,
    pub helpful_votes: u32,
}

impl ToFields for Review {
    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("customerName", self.customer_name.as_str())
            .with("customerImage", self.customer_image.as_str())
            .with("customerLocation", self.customer_location.as_str())
            .with("reviewText", self.review_text.as_str())
            .with("rating", self.rating)
            .with("reviewDate", self.review_date)
            .with("verifiedPurchase", self.verified_purchase)
            .with("helpfulVotes", self.helpful_votes)
    }
}

impl FromFields for Review {
    fn from_fields(fields: &Fields) -> Result<Self, StoreError> {
        let rating = fields.require("rating", Value::as_i64, "integer")?;
        let rating = u8::try_from(rating)
            .map_err(|_| StoreError::Decode(format!("rating {} is out of range", rating)))?;

        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Ok(Self {
            customer_name: fields
                .require("customerName", Value::as_str, "string")?
                .to_string(),
            customer_image: text("customerImage"),
            customer_location: text("customerLocation"),
            review_text: fields
                .require("reviewText", Value::as_str, "string")?
                .to_string(),
            rating,
            review_date: fields.require("reviewDate", Value::as_timestamp, "timestamp")?,
            verified_purchase: fields
                .get("verifiedPurchase")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            helpful_votes: fields
                .get("helpfulVotes")
                .and_then(Value::as_i64)
                .and_then(|votes| u32::try_from(votes).ok())
                .unwrap_or(0),
        })
    }
}

/// Aggregate over a product's reviews
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewSummary {
    pub total_reviews: usize,
    /// Arithmetic mean of all ratings; 0.0 without reviews
    pub average_rating: f64,
}

impl ReviewSummary {
    pub fn of(reviews: &[Review]) -> Self {
        let total_reviews = reviews.len();
        let average_rating = if total_reviews == 0 {
            0.0
        } else {
            let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
            f64::from(sum) / total_reviews as f64
        };

        Self {
            total_reviews,
            average_rating,
        }
    }

    /// Aggregate over stored `reviews` entries as they are.
    ///
    /// Every entry counts toward the total. Only entries carrying a numeric
    /// `rating` contribute to the average.
    pub fn of_entries(entries: &[Value]) -> Self {
        let ratings: Vec<f64> = entries
            .iter()
            .filter_map(|entry| entry.as_map()?.get("rating")?.as_f64())
            .collect();
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().sum::<f64>() / ratings.len() as f64
        };

        Self {
            total_reviews: entries.len(),
            average_rating,
        }
    }
}

/// Append `reviews` to a stored reviews document.
///
/// Entries already in the `reviews` array and any other top-level fields are
/// carried over exactly as stored; only the new records are encoded. The
/// aggregate is recomputed over the merged array.
pub fn append_entries(
    existing: Option<&Fields>,
    reviews: &[Review],
    now: DateTime<Utc>,
) -> Result<(Fields, ReviewSummary), StoreError> {
    let mut fields = existing.cloned().unwrap_or_default();

    let mut entries = match fields.get("reviews") {
        None => Vec::new(),
        Some(value) => value
            .as_array()
            .ok_or_else(|| StoreError::Decode("reviews is not an array".to_string()))?
            .to_vec(),
    };
    entries.extend(reviews.iter().map(|r| Value::from(r.to_fields())));

    let summary = ReviewSummary::of_entries(&entries);
    fields.insert("reviews", entries);
    fields.insert("totalReviews", summary.total_reviews);
    fields.insert("averageRating", summary.average_rating);
    fields.insert("lastUpdated", now);

    Ok((fields, summary))
}

/// Body of `reviews/{productId}`
#[derive(Debug, Clone, PartialEq)]
pub struct ProductReviews {
    pub reviews: Vec<Review>,
    pub summary: ReviewSummary,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ProductReviews {
    /// Build the document for `reviews`, recomputing the aggregate
    pub fn new(reviews: Vec<Review>, last_updated: DateTime<Utc>) -> Self {
        let summary = ReviewSummary::of(&reviews);
        Self {
            reviews,
            summary,
            last_updated: Some(last_updated),
        }
    }
}

impl ToFields for ProductReviews {
    fn to_fields(&self) -> Fields {
        let reviews = self
            .reviews
            .iter()
            .map(|r| Value::from(r.to_fields()))
            .collect::<Vec<_>>();

        let mut fields = Fields::new()
            .with("reviews", reviews)
            .with("totalReviews", self.summary.total_reviews)
            .with("averageRating", self.summary.average_rating);
        if let Some(last_updated) = self.last_updated {
            fields.insert("lastUpdated", last_updated);
        }
        fields
    }
}

impl FromFields for ProductReviews {
    fn from_fields(fields: &Fields) -> Result<Self, StoreError> {
        let reviews = fields
            .get("reviews")
            .and_then(Value::as_array)
            .unwrap_or_default()
            .iter()
            .map(|value| {
                value
                    .as_map()
                    .ok_or_else(|| StoreError::Decode("review entry is not a map".to_string()))
                    .and_then(Review::from_fields)
            })
            .collect::<Result<Vec<_>, _>>()?;

        // The stored aggregate may predate this tool; trust only the records.
        let summary = ReviewSummary::of(&reviews);
        let last_updated = fields.get("lastUpdated").and_then(Value::as_timestamp);

        Ok(Self {
            reviews,
            summary,
            last_updated,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn review(name: &str, rating: u8) -> Review {
        Review {
            customer_name: name.to_string(),
            customer_image: "https://images.unsplash.com/photo?w=60".to_string(),
            customer_location: "Pune".to_string(),
            review_text: "Lovely finish.".to_string(),
            rating,
            review_date: Utc.with_ymd_and_hms(2025, 3, 14, 10, 30, 0).unwrap(),
            verified_purchase: true,
            helpful_votes: 4,
        }
    }

    #[test]
    fn test_field_names() {
        let fields = review("Neha Joshi", 4).to_fields();
        for key in [
            "customerName",
            "customerImage",
            "customerLocation",
            "reviewText",
            "rating",
            "reviewDate",
            "verifiedPurchase",
            "helpfulVotes",
        ] {
            assert!(fields.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(fields.get("rating"), Some(&Value::IntegerValue(4)));
    }

    #[test]
    fn test_summary() {
        let empty = ReviewSummary::of(&[]);
        assert_eq!(empty.total_reviews, 0);
        assert_eq!(empty.average_rating, 0.0);

        let summary = ReviewSummary::of(&[review("a", 4), review("b", 5), review("c", 5)]);
        assert_eq!(summary.total_reviews, 3);
        assert!((summary.average_rating - 14.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_document_fields() {
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let doc = ProductReviews::new(vec![review("a", 4), review("b", 5)], now);
        let fields = doc.to_fields();

        assert_eq!(fields.get("totalReviews"), Some(&Value::IntegerValue(2)));
        assert_eq!(fields.get("averageRating"), Some(&Value::DoubleValue(4.5)));
        assert_eq!(fields.get("lastUpdated"), Some(&Value::TimestampValue(now)));

        let decoded = ProductReviews::from_fields(&fields).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_stale_aggregate_is_recomputed() {
        let fields = Fields::new()
            .with("reviews", vec![Value::from(review("a", 3).to_fields())])
            .with("totalReviews", 10i64)
            .with("averageRating", 1.0);

        let decoded = ProductReviews::from_fields(&fields).unwrap();
        assert_eq!(decoded.summary.total_reviews, 1);
        assert_eq!(decoded.summary.average_rating, 3.0);
        assert_eq!(decoded.last_updated, None);
    }

    #[test]
    fn test_string_dates_are_accepted() {
        let fields = review("a", 5)
            .to_fields()
            .with("reviewDate", "2024-12-01T08:00:00Z");
        let decoded = Review::from_fields(&fields).unwrap();
        assert_eq!(
            decoded.review_date,
            Utc.with_ymd_and_hms(2024, 12, 1, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_append_entries_keeps_stored_entries_verbatim() {
        let now = Utc.with_ymd_and_hms(2025, 5, 2, 9, 0, 0).unwrap();
        let replied = review("a", 2)
            .to_fields()
            .with("reply", "Sorry, a replacement is on its way.");
        let stored = Fields::new()
            .with("reviews", vec![Value::from(replied.clone())])
            .with("moderatedBy", "ops");

        let (fields, summary) = append_entries(Some(&stored), &[review("b", 4)], now).unwrap();

        let entries = fields.get("reviews").and_then(Value::as_array).unwrap();
        assert_eq!(entries[0], Value::from(replied));
        assert_eq!(fields.get("moderatedBy"), Some(&Value::from("ops")));
        assert_eq!(fields.get("lastUpdated"), Some(&Value::TimestampValue(now)));
        assert_eq!(summary.total_reviews, 2);
        assert_eq!(summary.average_rating, 3.0);
    }

    #[test]
    fn test_unrated_entries_count_but_do_not_average() {
        let entries = vec![
            Value::from(review("a", 5).to_fields()),
            Value::from(Fields::new().with("customerName", "legacy")),
        ];
        let summary = ReviewSummary::of_entries(&entries);
        assert_eq!(summary.total_reviews, 2);
        assert_eq!(summary.average_rating, 5.0);
        assert_eq!(ReviewSummary::of_entries(&[]).average_rating, 0.0);
    }

    #[test]
    fn test_append_entries_rejects_non_array_reviews() {
        let stored = Fields::new().with("reviews", "oops");
        assert!(matches!(
            append_entries(Some(&stored), &[review("a", 5)], Utc::now()),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn test_negative_rating_rejected() {
        let fields = review("a", 5).to_fields().with("rating", -1i64);
        assert!(matches!(
            Review::from_fields(&fields),
            Err(StoreError::Decode(_))
        ));
    }
}
