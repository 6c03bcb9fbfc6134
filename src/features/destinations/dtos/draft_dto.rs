use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::destinations::dtos::{DestinationResponseDto, ImageAttachmentDto};
use crate::features::destinations::models::Draft;
use crate::features::destinations::services::{ResolvedImages, SkippedImage, UpsertOutcome};

/// Response DTO for an open add-destination form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DraftResponseDto {
    pub id: Uuid,
    pub pending_images: Vec<ImageAttachmentDto>,
    pub created_at: DateTime<Utc>,
}

impl From<Draft> for DraftResponseDto {
    fn from(d: Draft) -> Self {
        Self {
            id: d.id,
            pending_images: d
                .pending
                .into_iter()
                .enumerate()
                .map(|(position, image)| ImageAttachmentDto::new(position, image))
                .collect(),
            created_at: d.created_at,
        }
    }
}

/// A photo that could not be read
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkippedImageDto {
    pub file_name: String,
    pub reason: String,
}

impl From<SkippedImage> for SkippedImageDto {
    fn from(s: SkippedImage) -> Self {
        Self {
            file_name: s.file_name,
            reason: s.reason.to_string(),
        }
    }
}

/// Result of a photo upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachImagesResponseDto {
    /// Completion order
    pub attached: Vec<ImageAttachmentDto>,
    pub skipped: Vec<SkippedImageDto>,
}

impl AttachImagesResponseDto {
    /// `first_position` is where the first attached image lands in its target list
    pub fn new(resolved: ResolvedImages, first_position: usize) -> Self {
        Self {
            attached: resolved
                .attached
                .into_iter()
                .enumerate()
                .map(|(i, image)| ImageAttachmentDto::new(first_position + i, image))
                .collect(),
            skipped: resolved.skipped.into_iter().map(Into::into).collect(),
        }
    }
}

/// Request DTO for submitting the add-destination form
///
/// Empty fields are accepted here and rejected by the creation workflow with
/// its own message.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitDraftDto {
    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    #[schema(example = "123 Main St")]
    pub address: String,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    #[schema(example = "Nice view")]
    pub description: String,
}

/// Response DTO for a submitted form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitDraftResponseDto {
    /// False when an existing destination with the same address was updated
    pub created: bool,
    pub destination: DestinationResponseDto,
}

impl From<UpsertOutcome> for SubmitDraftResponseDto {
    fn from(o: UpsertOutcome) -> Self {
        Self {
            created: o.created,
            destination: o.destination.into(),
        }
    }
}
