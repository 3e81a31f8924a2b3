//! HTTP+JSON client for the document store.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{
    Document, DocumentMetadata, DocumentStore, RenameRequest, StoreError, StoreResult,
};
use crate::app::search::{SearchRequest, SearchResult};
use crate::app::workspace::session::Session;

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'a> {
    file_path: &'a str,
    content: &'a str,
    is_folder: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody<'a> {
    file_path: &'a str,
    content: &'a str,
}

impl HttpDocumentStore {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        info!("Document store client targeting {}", base_url);
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a single document. Segments are escaped one by one so `/` keeps
    /// its meaning as the folder separator.
    pub fn document_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect();
        format!("{}/documents/{}", self.base_url, encoded.join("/"))
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{}", self.base_url, suffix)
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = StoreError::from_response(status.as_u16(), &body);
        debug!("Store request failed: {}", err);
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> StoreResult<T> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn list(&self, parent: &str) -> StoreResult<Vec<DocumentMetadata>> {
        let request = self
            .client
            .get(self.url("/documents"))
            .query(&[("parent", parent)]);
        // Some stores answer an empty folder with `null`
        let entries: Option<Vec<DocumentMetadata>> = self.send_json(request).await?;
        Ok(entries.unwrap_or_default())
    }

    async fn get(&self, path: &str) -> StoreResult<Document> {
        self.send_json(self.client.get(self.document_url(path)))
            .await
    }

    async fn create(&self, path: &str, content: &str, is_folder: bool) -> StoreResult<Document> {
        let body = CreateBody {
            file_path: path,
            content,
            is_folder,
        };
        self.send_json(self.client.post(self.url("/documents")).json(&body))
            .await
    }

    async fn update(&self, path: &str, content: &str) -> StoreResult<Document> {
        let body = UpdateBody {
            file_path: path,
            content,
        };
        self.send_json(self.client.put(self.document_url(path)).json(&body))
            .await
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        self.send(self.client.delete(self.document_url(path)))
            .await
            .map(|_| ())
    }

    async fn rename(&self, old_path: &str, new_path: &str) -> StoreResult<DocumentMetadata> {
        let body = RenameRequest {
            old_path: old_path.to_string(),
            new_path: new_path.to_string(),
        };
        let response = self
            .send(self.client.post(self.url("/documents/rename")).json(&body))
            .await?;
        let text = response.text().await?;
        // Stores that answer with an empty body still renamed successfully
        if text.trim().is_empty() {
            return Ok(DocumentMetadata::file(new_path));
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn search(&self, request: &SearchRequest) -> StoreResult<Vec<SearchResult>> {
        let results: Option<Vec<SearchResult>> = self
            .send_json(self.client.post(self.url("/documents/search")).json(request))
            .await?;
        Ok(results.unwrap_or_default())
    }

    async fn load_session(&self) -> StoreResult<Option<Session>> {
        let response = match self.send(self.client.get(self.url("/session"))).await {
            Ok(response) => response,
            Err(StoreError::NotFound { code: None, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let text = response.text().await?;
        if text.trim().is_empty() || text.trim() == "null" {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn save_session(&self, session: &Session) -> StoreResult<()> {
        self.send(self.client.post(self.url("/session")).json(session))
            .await
            .map(|_| ())
    }
}
