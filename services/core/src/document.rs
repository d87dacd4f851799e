use crate::error::StoreError;
use crate::value::Fields;
use async_trait::async_trait;
use std::fmt;

/// Address of a single document: `collection/document`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    collection: String,
    document: String,
}

impl DocumentPath {
    /// Build a path, rejecting empty segments and embedded slashes
    pub fn new(collection: impl Into<String>, document: impl Into<String>) -> Result<Self, StoreError> {
        let collection = collection.into();
        let document = document.into();

        for segment in [&collection, &document] {
            if segment.trim().is_empty() || segment.contains('/') {
                return Err(StoreError::InvalidPath(format!("{}/{}", collection, document)));
            }
        }

        Ok(Self {
            collection,
            document,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn document(&self) -> &str {
        &self.document
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.document)
    }
}

/// Opaque last-update marker of a stored document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(pub String);

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: DocumentPath,
    pub fields: Fields,
    pub revision: Option<Revision>,
}

/// Condition a write must satisfy to be applied
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Precondition {
    /// Unconditional write
    #[default]
    Any,
    /// The document must not exist yet
    Missing,
    /// The document must still be at this revision
    UpdatedAt(Revision),
}

impl Precondition {
    /// Expect the document to be exactly as it was when read
    pub fn unchanged_since(revision: Option<&Revision>) -> Self {
        match revision {
            Some(revision) => Precondition::UpdatedAt(revision.clone()),
            None => Precondition::Missing,
        }
    }
}

/// Collection/document store the admin tools are written against
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document; `None` when it does not exist
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    /// Replace (or create) a document when `precondition` holds.
    ///
    /// A failed precondition yields [`StoreError::Conflict`].
    async fn set_with_precondition(
        &self,
        path: &DocumentPath,
        fields: Fields,
        precondition: Precondition,
    ) -> Result<Document, StoreError>;

    /// Ids of every document in a collection
    async fn list_ids(&self, collection: &str) -> Result<Vec<String>, StoreError>;

    /// Unconditionally replace (or create) a document
    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<Document, StoreError> {
        self.set_with_precondition(path, fields, Precondition::Any)
            .await
    }
}
