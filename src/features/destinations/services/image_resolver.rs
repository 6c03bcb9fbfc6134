use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream::FuturesUnordered, StreamExt};
use thiserror::Error;
use uuid::Uuid;

use crate::features::destinations::models::{ImageAttachment, ImageSelection};
use crate::modules::storage::ImageStorage;

/// Image types a selection may declare
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/heic",
];

/// Why a picked photo could not be turned into an attachment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageDecodeFailure {
    #[error("image is empty")]
    Empty,
    #[error("image is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },
    #[error("unsupported image type '{0}'")]
    UnsupportedType(String),
    #[error("content is not a valid {0}")]
    Corrupt(String),
}

/// Turns a picker selection into a stored, renderable image handle
#[async_trait]
pub trait ImageResolver: Send + Sync {
    async fn resolve(
        &self,
        selection: ImageSelection,
    ) -> Result<ImageAttachment, ImageDecodeFailure>;
}

/// A selection that failed to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    pub file_name: String,
    pub reason: ImageDecodeFailure,
}

/// Outcome of resolving a batch of selections
#[derive(Debug, Default)]
pub struct ResolvedImages {
    /// Completion order, not selection order
    pub attached: Vec<ImageAttachment>,
    pub skipped: Vec<SkippedImage>,
}

/// Resolve all selections concurrently.
///
/// Successful handles are appended as they complete. Failures are logged and
/// collected; they never abort the batch.
pub async fn resolve_selections(
    resolver: &dyn ImageResolver,
    selections: Vec<ImageSelection>,
) -> ResolvedImages {
    let mut pending: FuturesUnordered<_> = selections
        .into_iter()
        .map(|selection| async move {
            let file_name = selection.file_name.clone();
            (file_name, resolver.resolve(selection).await)
        })
        .collect();

    let mut resolved = ResolvedImages::default();
    while let Some((file_name, result)) = pending.next().await {
        match result {
            Ok(attachment) => resolved.attached.push(attachment),
            Err(reason) => {
                tracing::warn!("Skipping image '{}': {}", file_name, reason);
                resolved.skipped.push(SkippedImage { file_name, reason });
            }
        }
    }

    resolved
}

/// Resolver for uploaded photo bytes.
///
/// Checks size, declared type and magic bytes, then stores the bytes under a
/// fresh handle id.
pub struct UploadImageResolver {
    storage: Arc<ImageStorage>,
    max_image_size: usize,
}

impl UploadImageResolver {
    pub fn new(storage: Arc<ImageStorage>, max_image_size: usize) -> Self {
        Self {
            storage,
            max_image_size,
        }
    }

    fn check(&self, selection: &ImageSelection) -> Result<(), ImageDecodeFailure> {
        let size = selection.data.len();
        if size == 0 {
            return Err(ImageDecodeFailure::Empty);
        }
        if size > self.max_image_size {
            return Err(ImageDecodeFailure::TooLarge {
                size,
                max: self.max_image_size,
            });
        }

        let content_type = selection.content_type.as_str();
        if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
            return Err(ImageDecodeFailure::UnsupportedType(content_type.to_string()));
        }
        if !matches_signature(content_type, &selection.data) {
            return Err(ImageDecodeFailure::Corrupt(content_type.to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl ImageResolver for UploadImageResolver {
    async fn resolve(
        &self,
        selection: ImageSelection,
    ) -> Result<ImageAttachment, ImageDecodeFailure> {
        self.check(&selection)?;

        let attachment = ImageAttachment {
            id: Uuid::now_v7(),
            file_name: selection.file_name,
            content_type: selection.content_type,
            size: selection.data.len(),
        };
        self.storage
            .put(attachment.id, &attachment.content_type, selection.data)
            .await;

        Ok(attachment)
    }
}

/// Magic-byte check for the declared type. HEIC containers vary too much and
/// are accepted by declared type alone.
fn matches_signature(content_type: &str, data: &[u8]) -> bool {
    match content_type {
        "image/jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        "image/png" => data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "image/gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        "image/webp" => data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP",
        "image/heic" => true,
        _ => false,
    }
}
