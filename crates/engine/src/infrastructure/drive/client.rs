//! Drive remote store client.
//!
//! Implements the RemoteStorePort trait over the Drive v3 REST API with a
//! bearer token. Failures are surfaced once to the caller; nothing here
//! retries.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::ports::{RemoteItem, RemoteStorePort, StoreError, FOLDER_MIME_TYPE};
use tablekeep_domain::FileId;

const LIST_FIELDS: &str = "files(id, name, mimeType, parents, webContentLink)";
const ITEM_FIELDS: &str = "id, name, mimeType, parents, webContentLink";

/// Client for the Drive v3 REST API.
#[derive(Clone)]
pub struct DriveClient {
    client: Client,
    api_base: String,
    upload_base: String,
    token: String,
    root_folder_id: FileId,
}

impl DriveClient {
    pub fn new(api_base: &str, upload_base: &str, token: &str, root_folder_id: FileId) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            root_folder_id,
        }
    }

    /// Map the `"root"`/empty alias onto the configured root folder.
    fn resolve<'a>(&'a self, id: &'a FileId) -> &'a FileId {
        if id.is_root_alias() {
            &self.root_folder_id
        } else {
            id
        }
    }

    async fn list_page(&self, query: &str, page_token: Option<&str>) -> Result<FileList, StoreError> {
        let mut request = self
            .client
            .get(format!("{}/files", self.api_base))
            .bearer_auth(&self.token)
            .query(&[
                ("q", query),
                ("fields", &format!("nextPageToken, {LIST_FIELDS}")),
                ("pageSize", "100"),
            ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn list_all(&self, query: &str) -> Result<Vec<RemoteItem>, StoreError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_page(query, page_token.as_deref()).await?;
            items.extend(page.files.into_iter().map(RemoteItem::from));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(items)
    }

    /// Create a file or folder from metadata alone, returning its new id.
    async fn create_item(&self, metadata: &FileMetadata<'_>) -> Result<FileId, StoreError> {
        let response = self
            .client
            .post(format!("{}/files", self.api_base))
            .bearer_auth(&self.token)
            .query(&[("fields", "id")])
            .json(metadata)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        let created: CreatedFile = check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        Ok(FileId::new(created.id))
    }

    /// Replace a file's media body.
    async fn upload_media(
        &self,
        id: &FileId,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(format!("{}/files/{id}", self.upload_base))
            .bearer_auth(&self.token)
            .query(&[("uploadType", "media")])
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        check(response).await?;
        Ok(())
    }

    async fn fetch_media(&self, id: &FileId) -> Result<Option<reqwest::Response>, StoreError> {
        let response = self
            .client
            .get(format!("{}/files/{id}", self.api_base))
            .bearer_auth(&self.token)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(check(response).await?))
    }
}

#[async_trait]
impl RemoteStorePort for DriveClient {
    async fn list_children(&self, folder_id: &FileId) -> Result<Vec<RemoteItem>, StoreError> {
        let folder_id = self.resolve(folder_id);
        let query = format!("'{folder_id}' in parents and trashed=false");

        let response = self
            .client
            .get(format!("{}/files", self.api_base))
            .bearer_auth(&self.token)
            .query(&[
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("orderBy", "folder,name"),
            ])
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        let listing: FileList = check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        Ok(listing.files.into_iter().map(RemoteItem::from).collect())
    }

    async fn get_metadata(&self, id: &FileId) -> Result<Option<RemoteItem>, StoreError> {
        let response = self
            .client
            .get(format!("{}/files/{id}", self.api_base))
            .bearer_auth(&self.token)
            .query(&[("fields", ITEM_FIELDS)])
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let file: DriveFile = check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        Ok(Some(file.into()))
    }

    async fn get_content(&self, id: &FileId) -> Result<Option<String>, StoreError> {
        match self.fetch_media(id).await? {
            Some(response) => response
                .text()
                .await
                .map(Some)
                .map_err(|e| StoreError::InvalidResponse(e.to_string())),
            None => Ok(None),
        }
    }

    async fn download(&self, id: &FileId) -> Result<Vec<u8>, StoreError> {
        match self.fetch_media(id).await? {
            Some(response) => response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| StoreError::InvalidResponse(e.to_string())),
            None => Err(StoreError::RequestFailed(format!("File {id} not found"))),
        }
    }

    async fn create_folder(&self, name: &str, parent_id: &FileId) -> Result<FileId, StoreError> {
        let parent_id = self.resolve(parent_id);
        self.create_item(&FileMetadata {
            name,
            mime_type: Some(FOLDER_MIME_TYPE),
            parents: vec![parent_id.as_str()],
        })
        .await
    }

    async fn create_file(
        &self,
        name: &str,
        parent_id: &FileId,
        content: &str,
    ) -> Result<FileId, StoreError> {
        let parent_id = self.resolve(parent_id);
        let id = self
            .create_item(&FileMetadata {
                name,
                mime_type: None,
                parents: vec![parent_id.as_str()],
            })
            .await?;
        self.upload_media(&id, "application/json", content.as_bytes().to_vec())
            .await?;
        Ok(id)
    }

    async fn update_content(&self, id: &FileId, content: &str) -> Result<(), StoreError> {
        self.upload_media(id, "application/json", content.as_bytes().to_vec())
            .await
    }

    async fn rename(&self, id: &FileId, new_name: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(format!("{}/files/{id}", self.api_base))
            .bearer_auth(&self.token)
            .query(&[("fields", "id, name")])
            .json(&serde_json::json!({ "name": new_name }))
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        check(response).await?;
        Ok(())
    }

    async fn upload(
        &self,
        name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
        parent_id: &FileId,
    ) -> Result<RemoteItem, StoreError> {
        let parent_id = self.resolve(parent_id);
        let id = self
            .create_item(&FileMetadata {
                name,
                mime_type: None,
                parents: vec![parent_id.as_str()],
            })
            .await?;
        self.upload_media(&id, mime_type, bytes).await?;

        // Re-fetch for the content link the caller hands back to the UI.
        self.get_metadata(&id)
            .await?
            .ok_or_else(|| StoreError::InvalidResponse(format!("Uploaded file {id} vanished")))
    }

    async fn make_public(&self, id: &FileId) -> Result<(), StoreError> {
        let response = self
            .client
            .post(format!("{}/files/{id}/permissions", self.api_base))
            .bearer_auth(&self.token)
            .query(&[("fields", "id")])
            .json(&serde_json::json!({ "type": "anyone", "role": "reader" }))
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        check(response).await?;
        Ok(())
    }

    async fn list_all_folders(&self) -> Result<Vec<RemoteItem>, StoreError> {
        self.list_all(&format!(
            "mimeType='{FOLDER_MIME_TYPE}' and trashed=false"
        ))
        .await
    }

    async fn search_entity_files(&self) -> Result<Vec<RemoteItem>, StoreError> {
        self.list_all("name contains 'metadata_' and name contains '.json' and trashed=false")
            .await
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(StoreError::RequestFailed(format!("{status}: {body}")))
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct FileMetadata<'a> {
    name: &'a str,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    mime_type: Option<&'a str>,
    parents: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(default, rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "mimeType")]
    mime_type: String,
    #[serde(default)]
    parents: Vec<String>,
    #[serde(default, rename = "webContentLink")]
    web_content_link: Option<String>,
}

impl From<DriveFile> for RemoteItem {
    fn from(file: DriveFile) -> Self {
        Self {
            id: FileId::new(file.id),
            name: file.name,
            mime_type: file.mime_type,
            parents: file.parents.into_iter().map(FileId::new).collect(),
            web_content_link: file.web_content_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_file_maps_onto_remote_item() {
        let file = DriveFile {
            id: "abc".to_string(),
            name: "Barrowmere".to_string(),
            mime_type: FOLDER_MIME_TYPE.to_string(),
            parents: vec!["root-id".to_string()],
            web_content_link: None,
        };

        let item = RemoteItem::from(file);
        assert!(item.is_folder());
        assert_eq!(item.parent_id(), Some(FileId::new("root-id")));
    }

    #[test]
    fn file_list_tolerates_missing_fields() {
        let listing: FileList = serde_json::from_str(r#"{"files": [{"id": "a"}]}"#).unwrap();
        assert_eq!(listing.files.len(), 1);
        assert!(listing.next_page_token.is_none());
        assert_eq!(listing.files[0].name, "");
    }

    #[test]
    fn root_alias_resolves_to_configured_root() {
        let client = DriveClient::new(
            "https://www.googleapis.com/drive/v3",
            "https://www.googleapis.com/upload/drive/v3",
            "token",
            FileId::new("configured-root"),
        );
        assert_eq!(
            client.resolve(&FileId::new("root")).as_str(),
            "configured-root"
        );
        assert_eq!(client.resolve(&FileId::new("abc")).as_str(), "abc");
    }
}
