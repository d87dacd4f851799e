use crate::document::{Document, DocumentPath, DocumentStore, Precondition, Revision};
use crate::error::StoreError;
use crate::value::Fields;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredDocument {
    fields: Fields,
    revision: u64,
}

/// In-process document store with the same write semantics as Firestore.
///
/// Revisions are a per-store counter, so every write produces a distinct
/// revision and preconditions behave like `updateTime` checks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, BTreeMap<String, StoredDocument>>>,
    next_revision: Mutex<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn bump_revision(&self) -> u64 {
        let mut next = self.next_revision.lock();
        *next += 1;
        *next
    }
}

fn to_document(path: &DocumentPath, stored: &StoredDocument) -> Document {
    Document {
        path: path.clone(),
        fields: stored.fields.clone(),
        revision: Some(Revision(stored.revision.to_string())),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.lock();
        Ok(collections
            .get(path.collection())
            .and_then(|docs| docs.get(path.document()))
            .map(|stored| to_document(path, stored)))
    }

    async fn set_with_precondition(
        &self,
        path: &DocumentPath,
        fields: Fields,
        precondition: Precondition,
    ) -> Result<Document, StoreError> {
        let revision = self.bump_revision();
        let mut collections = self.collections.lock();
        let docs = collections.entry(path.collection().to_string()).or_default();
        let current = docs.get(path.document());

        let holds = match (&precondition, current) {
            (Precondition::Any, _) => true,
            (Precondition::Missing, existing) => existing.is_none(),
            (Precondition::UpdatedAt(expected), Some(existing)) => {
                expected.0 == existing.revision.to_string()
            }
            (Precondition::UpdatedAt(_), None) => false,
        };

        if !holds {
            debug!(path = %path, ?precondition, "Precondition failed");
            return Err(StoreError::Conflict(path.to_string()));
        }

        let stored = StoredDocument { fields, revision };
        let document = to_document(path, &stored);
        docs.insert(path.document().to_string(), stored);

        Ok(document)
    }

    async fn list_ids(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .collections
            .lock()
            .get(collection)
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(doc: &str) -> DocumentPath {
        DocumentPath::new("products", doc).unwrap()
    }

    #[tokio::test]
    async fn test_set_replaces_whole_document() {
        let store = MemoryStore::new();
        store
            .set(&path("p1"), Fields::new().with("name", "old").with("price", 1i64))
            .await
            .unwrap();
        store
            .set(&path("p1"), Fields::new().with("name", "new"))
            .await
            .unwrap();

        let doc = store.get(&path("p1")).await.unwrap().unwrap();
        assert_eq!(doc.fields.len(), 1);
        assert_eq!(doc.fields.get("name").and_then(|v| v.as_str()), Some("new"));
    }

    #[tokio::test]
    async fn test_missing_document() {
        let store = MemoryStore::new();
        assert!(store.get(&path("nope")).await.unwrap().is_none());
        assert!(store.list_ids("products").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_preconditions() {
        let store = MemoryStore::new();

        let created = store
            .set_with_precondition(&path("p1"), Fields::new(), Precondition::Missing)
            .await
            .unwrap();

        // Creating again must fail
        let err = store
            .set_with_precondition(&path("p1"), Fields::new(), Precondition::Missing)
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let revision = created.revision.unwrap();
        let updated = store
            .set_with_precondition(
                &path("p1"),
                Fields::new().with("v", 2i64),
                Precondition::UpdatedAt(revision.clone()),
            )
            .await
            .unwrap();
        assert_ne!(updated.revision, Some(revision.clone()));

        // Stale revision
        let err = store
            .set_with_precondition(&path("p1"), Fields::new(), Precondition::UpdatedAt(revision))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_list_ids_sorted() {
        let store = MemoryStore::new();
        for id in ["b", "a", "c"] {
            store.set(&path(id), Fields::new()).await.unwrap();
        }
        assert_eq!(store.list_ids("products").await.unwrap(), vec!["a", "b", "c"]);
        assert_eq!(store.count("products"), 3);
    }
}
