//! In-memory image storage
//!
//! Holds the bytes behind every image attachment handle for the lifetime of
//! the process, so detail views can fetch a photo by its handle id.

use std::collections::HashMap;

use axum::body::Bytes;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Image bytes plus the content type they were uploaded with
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Default)]
pub struct ImageStorage {
    images: RwLock<HashMap<Uuid, StoredImage>>,
}

impl ImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, id: Uuid, content_type: &str, data: Bytes) {
        debug!("Storing image {} ({} bytes, {})", id, data.len(), content_type);
        self.images.write().await.insert(
            id,
            StoredImage {
                content_type: content_type.to_string(),
                data,
            },
        );
    }

    pub async fn get(&self, id: Uuid) -> Option<StoredImage> {
        self.images.read().await.get(&id).cloned()
    }

    /// Delete a batch of images, returning how many were present
    pub async fn delete_many(&self, ids: impl IntoIterator<Item = Uuid>) -> usize {
        let mut images = self.images.write().await;
        let removed = ids
            .into_iter()
            .filter(|id| images.remove(id).is_some())
            .count();
        if removed > 0 {
            debug!("Deleted {} stored images", removed);
        }
        removed
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let storage = ImageStorage::new();
        let id = Uuid::now_v7();

        storage
            .put(id, "image/png", Bytes::from_static(b"png-bytes"))
            .await;
        let stored = storage.get(id).await.unwrap();
        assert_eq!(stored.content_type, "image/png");
        assert_eq!(&stored.data[..], b"png-bytes");

        assert_eq!(storage.delete_many([id, Uuid::now_v7()]).await, 1);
        assert!(storage.get(id).await.is_none());
        assert_eq!(storage.len().await, 0);
    }
}
