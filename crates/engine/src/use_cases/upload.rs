//! File uploads into the remote store.

use std::sync::Arc;

use crate::infrastructure::drive::links;
use crate::infrastructure::ports::{RemoteStorePort, StoreError};
use tablekeep_domain::FileId;
use tablekeep_shared::responses::UploadResponse;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Missing required field: {0}")]
    Validation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct UploadOps {
    remote: Arc<dyn RemoteStorePort>,
}

impl UploadOps {
    pub fn new(remote: Arc<dyn RemoteStorePort>) -> Self {
        Self { remote }
    }

    /// Upload one file into a folder.
    ///
    /// Images are made world-readable and handed back as a direct-view link
    /// so the admin UI can drop them straight into an `<img>` tag; everything
    /// else keeps the store's own content link.
    pub async fn upload(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
        folder_id: &FileId,
    ) -> Result<UploadResponse, UploadError> {
        if file_name.is_empty() {
            return Err(UploadError::Validation("file"));
        }
        if folder_id.as_str().is_empty() {
            return Err(UploadError::Validation("folder_id"));
        }

        let item = self
            .remote
            .upload(file_name, mime_type, bytes, folder_id)
            .await?;

        let link = if item.mime_type.starts_with("image/") {
            if let Err(e) = self.remote.make_public(&item.id).await {
                tracing::warn!(file_id = %item.id, error = %e, "Failed to make image public");
            }
            links::direct_view_link(&item.id)
        } else {
            item.web_content_link.unwrap_or_default()
        };

        Ok(UploadResponse {
            ok: true,
            id: item.id,
            link,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockRemoteStorePort, RemoteItem};

    fn uploaded(id: &str, mime: &str, link: Option<&str>) -> RemoteItem {
        RemoteItem {
            id: FileId::new(id),
            name: "handout.png".to_string(),
            mime_type: mime.to_string(),
            parents: vec![],
            web_content_link: link.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn image_uploads_are_published_with_a_direct_view_link() {
        let mut remote = MockRemoteStorePort::new();
        remote
            .expect_upload()
            .returning(|_, _, _, _| Ok(uploaded("img-1", "image/png", None)));
        remote
            .expect_make_public()
            .withf(|id| id.as_str() == "img-1")
            .times(1)
            .returning(|_| Ok(()));

        let ops = UploadOps::new(Arc::new(remote));
        let response = ops
            .upload("handout.png", "image/png", vec![1, 2, 3], &FileId::new("f1"))
            .await
            .unwrap();

        assert!(response.ok);
        assert_eq!(
            response.link,
            "https://drive.google.com/uc?export=view&id=img-1"
        );
    }

    #[tokio::test]
    async fn non_images_keep_the_content_link_and_stay_private() {
        let mut remote = MockRemoteStorePort::new();
        remote.expect_upload().returning(|_, _, _, _| {
            Ok(uploaded(
                "doc-1",
                "application/pdf",
                Some("https://store.test/doc-1"),
            ))
        });
        remote.expect_make_public().times(0);

        let ops = UploadOps::new(Arc::new(remote));
        let response = ops
            .upload("notes.pdf", "application/pdf", vec![], &FileId::new("f1"))
            .await
            .unwrap();

        assert_eq!(response.link, "https://store.test/doc-1");
    }

    #[tokio::test]
    async fn a_failed_publish_still_returns_the_upload() {
        let mut remote = MockRemoteStorePort::new();
        remote
            .expect_upload()
            .returning(|_, _, _, _| Ok(uploaded("img-1", "image/jpeg", None)));
        remote
            .expect_make_public()
            .returning(|_| Err(StoreError::RequestFailed("denied".to_string())));

        let ops = UploadOps::new(Arc::new(remote));
        assert!(ops
            .upload("handout.jpg", "image/jpeg", vec![], &FileId::new("f1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let ops = UploadOps::new(Arc::new(MockRemoteStorePort::new()));
        assert!(matches!(
            ops.upload("", "image/png", vec![], &FileId::new("f1")).await,
            Err(UploadError::Validation("file"))
        ));
        assert!(matches!(
            ops.upload("a.png", "image/png", vec![], &FileId::new("")).await,
            Err(UploadError::Validation("folder_id"))
        ));
    }
}
