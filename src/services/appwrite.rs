use crate::models::{HouseholdRecord, PersonRecord};
use crate::services::repository::{RecordRepository, RepositoryError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Appwrite caps a single page at this many documents
pub const MAX_PAGE_SIZE: usize = 5000;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub participants: String,
    pub households: String,
}

/// Appwrite API client
///
/// Reads full snapshots of the participant and household collections,
/// paging through the documents endpoint until the collection is exhausted.
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
    page_size: usize,
}

/// One page of the documents listing
#[derive(Debug)]
struct DocumentPage {
    total: Option<u64>,
    documents: Vec<Value>,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
        page_size: usize,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        })
    }

    fn documents_url(&self, collection_id: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection_id
        )
    }

    /// Fetch one page of documents starting at `offset`
    async fn fetch_page(
        &self,
        collection_id: &str,
        offset: usize,
    ) -> Result<DocumentPage, AppwriteError> {
        let queries = [
            json!({ "method": "limit", "values": [self.page_size] }),
            json!({ "method": "offset", "values": [offset] }),
        ];

        let query_string = queries
            .iter()
            .map(|q| format!("queries[]={}", urlencoding::encode(&q.to_string())))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}?{}", self.documents_url(collection_id), query_string);

        tracing::debug!("Fetching {} documents from offset {}", collection_id, offset);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppwriteError::Unauthorized);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(AppwriteError::NotFound(format!("Collection {}", collection_id)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to list {} documents: {} - {}", collection_id, status, body);
            return Err(AppwriteError::ApiError(format!(
                "Failed to list documents in {}: {}",
                collection_id, status
            )));
        }

        let json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64());

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?
            .clone();

        Ok(DocumentPage { total, documents })
    }

    /// Fetch every document of a collection
    ///
    /// When the response carries `total`, pages are read until that many
    /// documents arrived, whatever the server's own page cap. Without it a
    /// short page ends the listing. An empty page always ends it.
    pub async fn list_documents(&self, collection_id: &str) -> Result<Vec<Value>, AppwriteError> {
        let mut documents = Vec::new();
        let mut offset = 0;
        let mut expected: Option<u64> = None;

        loop {
            let page = self.fetch_page(collection_id, offset).await?;
            let received = page.documents.len();
            expected = page.total.or(expected);

            documents.extend(page.documents);
            offset += received;

            if received == 0 {
                break;
            }

            let done = match page.total {
                Some(total) => offset as u64 >= total,
                None => received < self.page_size,
            };
            if done {
                break;
            }
        }

        if let Some(total) = expected.filter(|total| (documents.len() as u64) < *total) {
            tracing::warn!(
                "Listed {} of {} documents from {}",
                documents.len(),
                total,
                collection_id
            );
        }

        tracing::debug!("Listed {} documents from {}", documents.len(), collection_id);

        Ok(documents)
    }

    /// Fetch every participant document
    pub async fn list_participants(&self) -> Result<Vec<PersonRecord>, AppwriteError> {
        let documents = self.list_documents(&self.collections.participants).await?;
        Ok(documents.iter().filter_map(parse_participant).collect())
    }

    /// Fetch every household document
    pub async fn list_households(&self) -> Result<Vec<HouseholdRecord>, AppwriteError> {
        let documents = self.list_documents(&self.collections.households).await?;
        Ok(documents.iter().filter_map(parse_household).collect())
    }
}

#[async_trait]
impl RecordRepository for AppwriteClient {
    async fn list_participants(&self) -> Result<Vec<PersonRecord>, RepositoryError> {
        AppwriteClient::list_participants(self)
            .await
            .map_err(RepositoryError::store)
    }

    async fn list_households(&self) -> Result<Vec<HouseholdRecord>, RepositoryError> {
        AppwriteClient::list_households(self)
            .await
            .map_err(RepositoryError::store)
    }
}

/// Document payload, either at the top level or nested under `data`
fn document_data(doc: &Value) -> &Value {
    doc.get("data").unwrap_or(doc)
}

fn document_id(doc: &Value) -> Option<&str> {
    doc.get("$id").and_then(|id| id.as_str())
}

/// Parse a participant document, falling back to `$id` for the record id
pub fn parse_participant(doc: &Value) -> Option<PersonRecord> {
    match serde_json::from_value::<PersonRecord>(document_data(doc).clone()) {
        Ok(mut record) => {
            if record.record_id.is_empty() {
                record.record_id = document_id(doc).unwrap_or_default().to_string();
            }
            Some(record)
        }
        Err(e) => {
            tracing::warn!("Skipping malformed participant document {:?}: {}", document_id(doc), e);
            None
        }
    }
}

/// Parse a household document, falling back to `$id` for the household id
pub fn parse_household(doc: &Value) -> Option<HouseholdRecord> {
    match serde_json::from_value::<HouseholdRecord>(document_data(doc).clone()) {
        Ok(mut record) => {
            if record.household_id.is_empty() {
                record.household_id = document_id(doc).unwrap_or_default().to_string();
            }
            Some(record)
        }
        Err(e) => {
            tracing::warn!("Skipping malformed household document {:?}: {}", document_id(doc), e);
            None
        }
    }
}
