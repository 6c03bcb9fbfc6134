use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::config::MapConfig;
use crate::features::destinations::models::{Coordinate, Destination, ImageAttachment};

/// Coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoordinateDto {
    #[schema(example = 39.7817)]
    pub latitude: f64,
    #[schema(example = -89.6501)]
    pub longitude: f64,
}

impl From<Coordinate> for CoordinateDto {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// One photo of a destination, in display order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageAttachmentDto {
    pub id: Uuid,
    /// Index used by the remove-image endpoint
    pub position: usize,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    /// Where the bytes can be fetched
    pub url: String,
}

impl ImageAttachmentDto {
    pub fn new(position: usize, image: ImageAttachment) -> Self {
        Self {
            url: format!("/api/images/{}", image.id),
            id: image.id,
            position,
            file_name: image.file_name,
            content_type: image.content_type,
            size: image.size,
        }
    }
}

/// Response DTO for destination
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DestinationResponseDto {
    pub id: Uuid,
    /// Address as entered
    pub name: String,
    pub description: String,
    pub coordinate: CoordinateDto,
    pub images: Vec<ImageAttachmentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Destination> for DestinationResponseDto {
    fn from(d: Destination) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            coordinate: d.coordinate.into(),
            images: d
                .images
                .into_iter()
                .enumerate()
                .map(|(position, image)| ImageAttachmentDto::new(position, image))
                .collect(),
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Request DTO for replacing a destination's description
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDescriptionDto {
    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    pub description: String,
}

/// Multipart body for photo uploads (documentation only).
/// The actual handlers use axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImagesDto {
    /// One or more photos; repeat the field for each file
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Vec<String>,
}

/// Visible map region
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapRegionDto {
    pub center: CoordinateDto,
    #[schema(example = 100.0)]
    pub latitude_delta: f64,
    #[schema(example = 100.0)]
    pub longitude_delta: f64,
}

impl From<MapConfig> for MapRegionDto {
    fn from(m: MapConfig) -> Self {
        Self {
            center: CoordinateDto {
                latitude: m.center_lat,
                longitude: m.center_lon,
            },
            latitude_delta: m.span_lat,
            longitude_delta: m.span_lon,
        }
    }
}

/// Pin on the map
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapAnnotationDto {
    pub id: Uuid,
    pub name: String,
    pub coordinate: CoordinateDto,
}

impl From<&Destination> for MapAnnotationDto {
    fn from(d: &Destination) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            coordinate: d.coordinate.into(),
        }
    }
}

/// Initial region plus one annotation per destination
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DestinationMapDto {
    pub region: MapRegionDto,
    pub annotations: Vec<MapAnnotationDto>,
}

/// Response DTO for delete/dismiss operations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponseDto {
    pub deleted: bool,
}
