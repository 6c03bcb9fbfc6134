use utoipa::{Modify, OpenApi};

use crate::features::destinations::{dtos as destinations_dtos, handlers as destinations_handlers};
use crate::features::destinations::models::DestinationEvent;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Destinations
        destinations_handlers::list_destinations,
        destinations_handlers::get_map,
        destinations_handlers::stream_events,
        destinations_handlers::get_destination,
        destinations_handlers::update_description,
        destinations_handlers::delete_destination,
        destinations_handlers::append_images,
        destinations_handlers::remove_image,
        // Images
        destinations_handlers::get_image,
        // Drafts (add-destination form)
        destinations_handlers::open_draft,
        destinations_handlers::get_draft,
        destinations_handlers::attach_images,
        destinations_handlers::submit_draft,
        destinations_handlers::dismiss_draft,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Destinations
            destinations_dtos::CoordinateDto,
            destinations_dtos::ImageAttachmentDto,
            destinations_dtos::DestinationResponseDto,
            destinations_dtos::UpdateDescriptionDto,
            destinations_dtos::UploadImagesDto,
            destinations_dtos::DeletedResponseDto,
            destinations_dtos::MapRegionDto,
            destinations_dtos::MapAnnotationDto,
            destinations_dtos::DestinationMapDto,
            DestinationEvent,
            ApiResponse<Vec<destinations_dtos::DestinationResponseDto>>,
            ApiResponse<destinations_dtos::DestinationResponseDto>,
            ApiResponse<destinations_dtos::DestinationMapDto>,
            ApiResponse<destinations_dtos::DeletedResponseDto>,
            // Drafts
            destinations_dtos::DraftResponseDto,
            destinations_dtos::SkippedImageDto,
            destinations_dtos::AttachImagesResponseDto,
            destinations_dtos::SubmitDraftDto,
            destinations_dtos::SubmitDraftResponseDto,
            ApiResponse<destinations_dtos::DraftResponseDto>,
            ApiResponse<destinations_dtos::AttachImagesResponseDto>,
            ApiResponse<destinations_dtos::SubmitDraftResponseDto>,
        )
    ),
    tags(
        (name = "destinations", description = "Saved travel destinations and their map"),
        (name = "drafts", description = "Add-destination form: attach photos, then submit an address"),
        (name = "images", description = "Photo bytes by handle"),
    ),
    info(
        title = "Travelmap API",
        version = "0.1.0",
        description = "API documentation for Travelmap",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
