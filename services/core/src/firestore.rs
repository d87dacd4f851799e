//! Firestore REST v1 client.
//!
//! Only the handful of calls the admin tools need: read a document, replace
//! a document (optionally guarded by a precondition), and list the document
//! ids of a collection.

use crate::auth::{Authenticator, ServiceAccountKey, TokenProvider};
use crate::config::FirestoreConfig;
use crate::document::{Document, DocumentPath, DocumentStore, Precondition, Revision};
use crate::error::StoreError;
use crate::value::Fields;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com/v1";

/// Document resource as returned by the API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: Fields,
    #[serde(default)]
    update_time: Option<String>,
}

impl RestDocument {
    fn id(&self) -> Option<&str> {
        self.name.rsplit('/').next().filter(|id| !id.is_empty())
    }

    fn into_document(self, path: DocumentPath) -> Document {
        Document {
            path,
            fields: self.fields,
            revision: self.update_time.map(Revision),
        }
    }
}

#[derive(Debug, Serialize)]
struct RestWrite<'a> {
    fields: &'a Fields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<RestDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Firestore-backed [`DocumentStore`]
pub struct FirestoreClient {
    http: reqwest::Client,
    base_url: Url,
    project_id: String,
    database: String,
    auth: Authenticator,
    page_size: u32,
}

impl FirestoreClient {
    /// Create a client, resolving credentials from the configuration.
    ///
    /// Credentials are taken from, in order: `access_token`, the
    /// service-account key at `credentials_path`, or nothing at all when an
    /// `endpoint_url` (the emulator) is configured and no key file exists.
    pub fn new(config: &FirestoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let mut key_project = None;
        let auth = if let Some(token) = config.access_token.clone() {
            Authenticator::Static(token)
        } else if config.credentials_path.exists() || config.endpoint_url.is_none() {
            let key = ServiceAccountKey::from_file(&config.credentials_path)?;
            key_project = Some(key.project_id.clone());
            Authenticator::ServiceAccount(TokenProvider::new(key, http.clone()))
        } else {
            Authenticator::Anonymous
        };

        let project_id = config
            .project_id
            .clone()
            .or(key_project)
            .ok_or_else(|| StoreError::Credentials {
                path: config.credentials_path.display().to_string(),
                message: "firestore.project_id is not set and no service-account key provides one"
                    .to_string(),
            })?;

        let client = Self::with_authenticator(http, config, &project_id, auth)?;

        info!(
            project_id = %project_id,
            database = %config.database,
            endpoint = %client.base_url,
            auth = client.auth.describe(),
            "Firestore client initialized"
        );

        Ok(client)
    }

    /// Assemble a client from already-resolved parts
    pub fn with_authenticator(
        http: reqwest::Client,
        config: &FirestoreConfig,
        project_id: &str,
        auth: Authenticator,
    ) -> Result<Self, StoreError> {
        let endpoint = config.endpoint_url.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let base_url = Url::parse(endpoint)
            .map_err(|e| StoreError::Endpoint(format!("{}: {}", endpoint, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Endpoint(endpoint.to_string()));
        }

        Ok(Self {
            http,
            base_url,
            project_id: project_id.to_string(),
            database: config.database.clone(),
            auth,
            page_size: config.page_size.max(1),
        })
    }

    /// Resource URL under the database's `documents` root.
    ///
    /// Every segment is percent-encoded, so ids containing `#`, `?` or `%`
    /// address the document rather than a fragment or query.
    fn documents_url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Endpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database.as_str(),
                "documents",
            ])
            .extend(segments);
        Ok(url)
    }

    fn collection_url(&self, collection: &str) -> Result<Url, StoreError> {
        self.documents_url(&[collection])
    }

    fn document_url(&self, path: &DocumentPath) -> Result<Url, StoreError> {
        self.documents_url(&[path.collection(), path.document()])
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, StoreError> {
        let mut request = self.http.request(method, url);
        if let Some(token) = self.auth.bearer_token().await? {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }
}

/// Map a non-success response onto a [`StoreError`]
async fn check_status(response: Response, target: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => (envelope.error.status, envelope.error.message),
        Err(_) => (
            status.canonical_reason().unwrap_or("UNKNOWN").to_string(),
            body,
        ),
    };

    match code.as_str() {
        "FAILED_PRECONDITION" | "ABORTED" | "ALREADY_EXISTS" => {
            Err(StoreError::Conflict(target.to_string()))
        }
        _ => Err(StoreError::Status {
            status: status.as_u16(),
            code,
            message,
        }),
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    #[instrument(skip(self), fields(path = %path))]
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let response = self
            .request(Method::GET, self.document_url(path)?)
            .await?
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Document does not exist");
            return Ok(None);
        }

        let response = check_status(response, &path.to_string()).await?;
        let document: RestDocument = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(Some(document.into_document(path.clone())))
    }

    #[instrument(skip(self, fields), fields(path = %path))]
    async fn set_with_precondition(
        &self,
        path: &DocumentPath,
        fields: Fields,
        precondition: Precondition,
    ) -> Result<Document, StoreError> {
        // No update mask: the stored document is replaced wholesale
        let mut request = self.request(Method::PATCH, self.document_url(path)?).await?;
        match &precondition {
            Precondition::Any => {}
            Precondition::Missing => {
                request = request.query(&[("currentDocument.exists", "false")]);
            }
            Precondition::UpdatedAt(revision) => {
                request = request.query(&[("currentDocument.updateTime", revision.0.as_str())]);
            }
        }

        let response = request.json(&RestWrite { fields: &fields }).send().await?;
        let response = check_status(response, &path.to_string()).await?;
        let document: RestDocument = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        debug!(revision = ?document.update_time, "Document written");

        Ok(document.into_document(path.clone()))
    }

    #[instrument(skip(self))]
    async fn list_ids(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        if collection.trim().is_empty() || collection.contains('/') {
            return Err(StoreError::InvalidPath(collection.to_string()));
        }

        let url = self.collection_url(collection)?;
        let page_size = self.page_size.to_string();
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::GET, url.clone())
                .await?
                .query(&[("pageSize", page_size.as_str())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = check_status(request.send().await?, collection).await?;
            let page: ListDocumentsResponse = response
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;

            ids.extend(page.documents.iter().filter_map(|d| d.id()).map(String::from));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = ids.len(), "Listed document ids");
        Ok(ids)
    }
}
