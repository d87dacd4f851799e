//! Thapasya Core
//!
//! Shared plumbing for the Thapasya catalog admin tools: a small Firestore
//! REST client, the [`DocumentStore`] seam the tools are written against, an
//! in-memory store, typed document values, layered configuration loading and
//! tracing setup.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ drive-links  │   │ catalog-     │   │ review-      │
//! │              │   │ seeder       │   │ manager      │
//! └──────────────┘   └──────────────┘   └──────────────┘
//!                           │                  │
//!                           ▼                  ▼
//!                    ┌─────────────────────────────┐
//!                    │ DocumentStore               │
//!                    │  ├─ FirestoreClient (REST)  │
//!                    │  └─ MemoryStore             │
//!                    └─────────────────────────────┘
//!                                  │
//!                                  ▼
//!                    ┌─────────────────────────────┐
//!                    │ Authenticator               │
//!                    │ (service account / token)   │
//!                    └─────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod document;
pub mod error;
pub mod firestore;
pub mod memory;
pub mod telemetry;
pub mod value;

pub use auth::{Authenticator, ServiceAccountKey};
pub use config::{ConfigError, FirestoreConfig, LoggingConfig};
pub use document::{Document, DocumentPath, DocumentStore, Precondition, Revision};
pub use error::StoreError;
pub use firestore::FirestoreClient;
pub use memory::MemoryStore;
pub use telemetry::init_tracing;
pub use value::{Fields, FromFields, ToFields, Value};
