use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thapasya_core::{
    Document, DocumentPath, DocumentStore, Fields, FromFields, MemoryStore, Precondition,
    StoreError, ToFields,
};
use thapasya_reviews::{
    custom_review, generate_for_products, ProductReviews, Review, ReviewError, ReviewGenerator,
    ReviewSettings, ReviewStore, SampleData,
};

fn fast_settings(max_merge_attempts: u32) -> ReviewSettings {
    ReviewSettings {
        max_merge_attempts,
        retry_base_delay_ms: 1,
        retry_max_delay_ms: 2,
        ..Default::default()
    }
}

fn review(name: &str, rating: u8) -> Review {
    custom_review(name, "Lovely.", rating, "Delhi", "https://example.com/a.jpg").unwrap()
}

/// Lets another writer land between our read and our write, `races` times
struct RacingStore {
    inner: MemoryStore,
    races: Mutex<u32>,
    rival: Review,
}

impl RacingStore {
    fn new(races: u32, rival: Review) -> Self {
        Self {
            inner: MemoryStore::new(),
            races: Mutex::new(races),
            rival,
        }
    }
}

#[async_trait]
impl DocumentStore for RacingStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        self.inner.get(path).await
    }

    async fn set_with_precondition(
        &self,
        path: &DocumentPath,
        fields: Fields,
        precondition: Precondition,
    ) -> Result<Document, StoreError> {
        let race = {
            let mut races = self.races.lock();
            let race = *races > 0;
            if race {
                *races -= 1;
            }
            race
        };

        if race {
            let mut existing = match self.inner.get(path).await? {
                Some(doc) => ProductReviews::from_fields(&doc.fields)?.reviews,
                None => Vec::new(),
            };
            existing.push(self.rival.clone());
            let rival_body = ProductReviews::new(existing, Utc::now());
            self.inner.set(path, rival_body.to_fields()).await?;
        }

        self.inner
            .set_with_precondition(path, fields, precondition)
            .await
    }

    async fn list_ids(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        self.inner.list_ids(collection).await
    }
}

#[tokio::test]
async fn appending_m_to_n_reviews_keeps_all_and_averages() {
    let store = MemoryStore::new();
    let settings = fast_settings(3);
    let reviews = ReviewStore::new(&store, &settings);

    let existing = [review("a", 3), review("b", 4), review("c", 5), review("d", 2)];
    let added = [review("e", 5), review("f", 1)];

    reviews.append_reviews("prod-1", &existing).await.unwrap();
    let summary = reviews.append_reviews("prod-1", &added).await.unwrap();

    assert_eq!(summary.total_reviews, 6);
    assert!((summary.average_rating - 20.0 / 6.0).abs() < 1e-9);

    let stored = reviews.load("prod-1").await.unwrap().unwrap();
    assert_eq!(stored.reviews.len(), 6);
    assert_eq!(stored.summary, summary);
}

#[tokio::test]
async fn first_five_star_review() {
    let store = MemoryStore::new();
    let settings = fast_settings(3);
    let reviews = ReviewStore::new(&store, &settings);

    let summary = reviews
        .append_reviews("prod-2", &[review("Priya Sharma", 5)])
        .await
        .unwrap();

    assert_eq!(summary.total_reviews, 1);
    assert_eq!(summary.average_rating, 5.0);
}

#[tokio::test]
async fn concurrent_write_is_merged_not_lost() {
    let store = RacingStore::new(1, review("Rival Writer", 1));
    let settings = fast_settings(3);
    let reviews = ReviewStore::new(&store, &settings);

    reviews
        .append_reviews("prod-3", &[review("First", 5)])
        .await
        .unwrap();
    // The rival already landed during the first append; add one more race.
    *store.races.lock() = 1;
    let summary = reviews
        .append_reviews("prod-3", &[review("Second", 4)])
        .await
        .unwrap();

    let names: Vec<_> = reviews
        .load("prod-3")
        .await
        .unwrap()
        .unwrap()
        .reviews
        .into_iter()
        .map(|r| r.customer_name)
        .collect();

    assert_eq!(names, vec!["Rival Writer", "First", "Rival Writer", "Second"]);
    assert_eq!(summary.total_reviews, 4);
    assert!((summary.average_rating - 11.0 / 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn persistent_conflicts_give_up() {
    let store = RacingStore::new(10, review("Rival Writer", 1));
    let settings = fast_settings(3);
    let reviews = ReviewStore::new(&store, &settings);

    let result = reviews.append_reviews("prod-4", &[review("Mine", 5)]).await;

    assert!(matches!(
        result,
        Err(ReviewError::MergeConflict { attempts: 3, .. })
    ));
    assert_eq!(*store.races.lock(), 7);
}

#[tokio::test]
async fn batch_continues_past_failing_product() {
    let store = MemoryStore::new();
    let settings = fast_settings(3);
    let reviews = ReviewStore::new(&store, &settings);
    let mut generator = ReviewGenerator::new(SampleData::default(), StdRng::seed_from_u64(5));

    let ids = vec!["p1".to_string(), "bad/id".to_string(), "p3".to_string()];
    let mut out = Vec::new();
    let outcome = generate_for_products(&reviews, &mut generator, &ids, 3, &mut out)
        .await
        .unwrap();

    assert_eq!(outcome.succeeded.len(), 2);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, "bad/id");
    assert_eq!(store.count("reviews"), 2);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("❌ Error adding reviews to product bad/id"));
    assert!(text.contains("✅ Added 3 reviews to product p3"));
}
