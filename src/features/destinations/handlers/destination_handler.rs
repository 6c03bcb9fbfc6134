use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    response::{
        sse::{Event, KeepAlive},
        Sse,
    },
    Json,
};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;
use uuid::Uuid;

use crate::core::config::{ImageConfig, MapConfig};
use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::destinations::dtos::{
    AttachImagesResponseDto, DeletedResponseDto, DestinationMapDto, DestinationResponseDto,
    MapAnnotationDto, UpdateDescriptionDto, UploadImagesDto,
};
use crate::features::destinations::handlers::upload::read_image_selections;
use crate::features::destinations::services::{DestinationService, DraftService};
use crate::shared::types::{ApiResponse, Meta};

/// State for destination, draft and image handlers
#[derive(Clone)]
pub struct DestinationState {
    pub destinations: Arc<DestinationService>,
    pub drafts: Arc<DraftService>,
    pub images: ImageConfig,
    pub map: MapConfig,
}

/// List all destinations in the order they were added
#[utoipa::path(
    get,
    path = "/api/destinations",
    responses(
        (status = 200, description = "List of destinations", body = ApiResponse<Vec<DestinationResponseDto>>)
    ),
    tag = "destinations"
)]
pub async fn list_destinations(
    State(state): State<DestinationState>,
) -> Result<Json<ApiResponse<Vec<DestinationResponseDto>>>> {
    let destinations = state.destinations.list().await;
    let total = destinations.len();
    let dtos: Vec<DestinationResponseDto> = destinations.into_iter().map(|d| d.into()).collect();
    Ok(Json(ApiResponse::ok(dtos).with_meta(Meta { total })))
}

/// Initial map region and one pin per destination
#[utoipa::path(
    get,
    path = "/api/destinations/map",
    responses(
        (status = 200, description = "Map view", body = ApiResponse<DestinationMapDto>)
    ),
    tag = "destinations"
)]
pub async fn get_map(
    State(state): State<DestinationState>,
) -> Result<Json<ApiResponse<DestinationMapDto>>> {
    let destinations = state.destinations.list().await;
    let dto = DestinationMapDto {
        region: state.map.into(),
        annotations: destinations.iter().map(MapAnnotationDto::from).collect(),
    };
    Ok(Json(ApiResponse::ok(dto)))
}

/// Stream of destination change events
#[utoipa::path(
    get,
    path = "/api/destinations/events",
    responses(
        (status = 200, description = "SSE stream of destination events", content_type = "text/event-stream")
    ),
    tag = "destinations"
)]
pub async fn stream_events(
    State(state): State<DestinationState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.destinations.subscribe()).filter_map(|received| {
        let event = match received {
            Ok(event) => event,
            Err(lagged) => {
                // Slow subscribers skip ahead; clients refetch on reconnect
                debug!("Event subscriber lagging: {}", lagged);
                return None;
            }
        };
        Event::default()
            .event(event.kind())
            .json_data(&event)
            .ok()
            .map(Ok::<_, Infallible>)
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(std::time::Duration::from_secs(15))
            .text("ping"),
    )
}

/// Get destination by ID
#[utoipa::path(
    get,
    path = "/api/destinations/{id}",
    params(
        ("id" = Uuid, Path, description = "Destination ID")
    ),
    responses(
        (status = 200, description = "Destination found", body = ApiResponse<DestinationResponseDto>),
        (status = 404, description = "Destination not found")
    ),
    tag = "destinations"
)]
pub async fn get_destination(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DestinationResponseDto>>> {
    let destination = state.destinations.get(id).await?;
    Ok(Json(ApiResponse::ok(destination.into())))
}

/// Replace a destination's description
#[utoipa::path(
    patch,
    path = "/api/destinations/{id}",
    params(
        ("id" = Uuid, Path, description = "Destination ID")
    ),
    request_body = UpdateDescriptionDto,
    responses(
        (status = 200, description = "Description updated", body = ApiResponse<DestinationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Destination not found")
    ),
    tag = "destinations"
)]
pub async fn update_description(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateDescriptionDto>,
) -> Result<Json<ApiResponse<DestinationResponseDto>>> {
    let destination = state
        .destinations
        .update_description(id, dto.description)
        .await?;
    Ok(Json(
        ApiResponse::ok(destination.into()).with_message("Description updated"),
    ))
}

/// Delete a destination and its photos
#[utoipa::path(
    delete,
    path = "/api/destinations/{id}",
    params(
        ("id" = Uuid, Path, description = "Destination ID")
    ),
    responses(
        (status = 200, description = "Destination deleted", body = ApiResponse<DeletedResponseDto>),
        (status = 404, description = "Destination not found")
    ),
    tag = "destinations"
)]
pub async fn delete_destination(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedResponseDto>>> {
    state.destinations.delete(id).await?;
    Ok(Json(
        ApiResponse::ok(DeletedResponseDto { deleted: true })
            .with_message("Destination deleted"),
    ))
}

/// Append photos to a destination
///
/// Accepts multipart/form-data with one or more `image` parts. Photos that
/// cannot be read are reported under `skipped`.
#[utoipa::path(
    post,
    path = "/api/destinations/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Destination ID")
    ),
    request_body(
        content = UploadImagesDto,
        content_type = "multipart/form-data",
        description = "One or more `image` parts",
    ),
    responses(
        (status = 200, description = "Photos processed", body = ApiResponse<AttachImagesResponseDto>),
        (status = 400, description = "No image or too many images"),
        (status = 404, description = "Destination not found"),
        (status = 413, description = "Upload too large")
    ),
    tag = "destinations"
)]
pub async fn append_images(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<AttachImagesResponseDto>>> {
    // Fail before storing any bytes
    state.destinations.get(id).await?;

    let selections = read_image_selections(multipart, state.images.max_images_per_upload).await?;
    let resolved = state.destinations.resolve_images(selections).await;

    let first_position = if resolved.attached.is_empty() {
        state.destinations.get(id).await?.images.len()
    } else {
        let attached = resolved.attached.len();
        let destination = state
            .destinations
            .append_images(id, resolved.attached.clone())
            .await?;
        destination.images.len() - attached
    };

    Ok(Json(ApiResponse::ok(AttachImagesResponseDto::new(
        resolved,
        first_position,
    ))))
}

/// Remove one photo from a destination
#[utoipa::path(
    delete,
    path = "/api/destinations/{id}/images/{position}",
    params(
        ("id" = Uuid, Path, description = "Destination ID"),
        ("position" = usize, Path, description = "Zero-based photo position")
    ),
    responses(
        (status = 200, description = "Photo removed", body = ApiResponse<DestinationResponseDto>),
        (status = 400, description = "Last photo cannot be removed"),
        (status = 404, description = "Destination or photo not found")
    ),
    tag = "destinations"
)]
pub async fn remove_image(
    State(state): State<DestinationState>,
    Path((id, position)): Path<(Uuid, usize)>,
) -> Result<Json<ApiResponse<DestinationResponseDto>>> {
    let destination = state.destinations.remove_image(id, position).await?;
    Ok(Json(ApiResponse::ok(destination.into()).with_message("Image removed")))
}
