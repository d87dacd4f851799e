use async_trait::async_trait;
use thapasya_core::{
    Document, DocumentPath, DocumentStore, Fields, MemoryStore, Precondition, StoreError, Value,
};
use thapasya_seeder::{
    featured_products, run, with_direct_image_links, SeedError, SeedSettings, SeederConfig,
};

/// Rejects every call the way an unauthorized project would
struct DeniedStore;

#[async_trait]
impl DocumentStore for DeniedStore {
    async fn get(&self, _path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        Err(denied())
    }

    async fn set_with_precondition(
        &self,
        _path: &DocumentPath,
        _fields: Fields,
        _precondition: Precondition,
    ) -> Result<Document, StoreError> {
        Err(denied())
    }

    async fn list_ids(&self, _collection: &str) -> Result<Vec<String>, StoreError> {
        Err(denied())
    }
}

fn denied() -> StoreError {
    StoreError::Status {
        status: 403,
        code: "PERMISSION_DENIED".to_string(),
        message: "Missing or insufficient permissions.".to_string(),
    }
}

fn default_settings() -> SeedSettings {
    SeedSettings {
        target: SeederConfig::default().catalog.target().unwrap(),
        verify: true,
    }
}

#[tokio::test]
async fn seeding_then_reading_back_yields_eight_products() {
    let store = MemoryStore::new();
    let settings = default_settings();
    let mut out = Vec::new();

    run(&store, &settings, &featured_products(), &mut out)
        .await
        .unwrap();

    let document = store.get(&settings.target).await.unwrap().unwrap();
    let stored = document.fields.get("products").and_then(Value::as_array).unwrap();
    assert_eq!(stored.len(), 8);
    assert_eq!(store.count("featured_products"), 1);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Total products: 8"));
}

#[tokio::test]
async fn converted_images_are_stored() {
    let store = MemoryStore::new();
    let settings = default_settings();
    let products = with_direct_image_links(featured_products());

    run(&store, &settings, &products, &mut Vec::new())
        .await
        .unwrap();

    let document = store.get(&settings.target).await.unwrap().unwrap();
    let first = document.fields.get("products").and_then(Value::as_array).unwrap()[0]
        .as_map()
        .unwrap();
    assert_eq!(
        first.get("image").and_then(Value::as_str),
        Some("https://drive.google.com/uc?export=view&id=18pMwmGDFxcC03z9XR8D48DUjY_yLxr78")
    );
}

#[tokio::test]
async fn write_failure_is_reported_and_aborts() {
    let mut out = Vec::new();

    let result = run(&DeniedStore, &default_settings(), &featured_products(), &mut out).await;

    assert!(matches!(result, Err(SeedError::Save(_))));
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("❌ Error saving featured products:"));
    assert!(!text.contains("Reading back"));
}
